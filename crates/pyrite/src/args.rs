//! Positional-argument helpers for builtins and type methods.
//!
//! The call protocol hands callables their arguments in natural order as a
//! small inline buffer; these helpers check arity and unpack, producing the
//! standard `TypeError` messages on mismatch.

use smallvec::SmallVec;

use crate::{
    exception::{ExcType, RunResult},
    value::Value,
};

/// Natural-order argument buffer.
///
/// Most calls have at most a few arguments, so the inline capacity avoids a
/// heap allocation for the common case.
pub(crate) type ArgVec = SmallVec<[Value; 4]>;

pub(crate) fn check_zero_args(name: &str, args: &ArgVec) -> RunResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ExcType::arg_count(name, 0, args.len()))
    }
}

pub(crate) fn one_arg(name: &str, mut args: ArgVec) -> RunResult<Value> {
    if args.len() == 1 {
        Ok(args.remove(0))
    } else {
        Err(ExcType::arg_count(name, 1, args.len()))
    }
}

pub(crate) fn two_args(name: &str, mut args: ArgVec) -> RunResult<(Value, Value)> {
    if args.len() == 2 {
        let b = args.remove(1);
        let a = args.remove(0);
        Ok((a, b))
    } else {
        Err(ExcType::arg_count(name, 2, args.len()))
    }
}

/// One required argument plus one optional.
pub(crate) fn one_two_args(name: &str, mut args: ArgVec) -> RunResult<(Value, Option<Value>)> {
    match args.len() {
        1 => Ok((args.remove(0), None)),
        2 => {
            let b = args.remove(1);
            Ok((args.remove(0), Some(b)))
        }
        n => Err(at_least_at_most(name, 1, 2, n)),
    }
}

/// Between `min` and `max` arguments, returned as the raw buffer.
pub(crate) fn between_args(name: &str, min: usize, max: usize, args: ArgVec) -> RunResult<ArgVec> {
    if (min..=max).contains(&args.len()) {
        Ok(args)
    } else {
        Err(at_least_at_most(name, min, max, args.len()))
    }
}

/// At least `min` arguments.
pub(crate) fn at_least_args(name: &str, min: usize, args: ArgVec) -> RunResult<ArgVec> {
    if args.len() >= min {
        Ok(args)
    } else {
        Err(ExcType::type_error(format!(
            "{name}() takes at least {min} arguments but {} were given",
            args.len()
        )))
    }
}

fn at_least_at_most(name: &str, min: usize, max: usize, got: usize) -> crate::exception::SimpleException {
    if got < min {
        ExcType::type_error(format!("{name}() takes at least {min} arguments but {got} were given"))
    } else {
        ExcType::type_error(format!("{name}() takes at most {max} arguments but {got} were given"))
    }
}
