//! Procs and blocks.
//!
//! A proc either forwards to a message send (the result of `Symbol#to_proc`)
//! or runs a native block body. Native blocks declare their parameter window
//! and have their arguments bound by [`Args::to_array_for_block`]; lambdas
//! check their argument count like methods do.

use std::fmt;
use std::sync::Arc;

use garnet_util::Symbol;

use crate::args::Args;
use crate::error::RunResult;
use crate::runtime::Env;
use crate::value::Value;

/// Body of a native block, called with the bound parameters
pub type BlockFn = Arc<dyn Fn(&mut Env, &[Value]) -> RunResult<Value> + Send + Sync>;

/// A native block with its declared parameter window
#[derive(Clone)]
pub struct Block {
    min: usize,
    max: Option<usize>,
    spread: bool,
    body: BlockFn,
}

impl Block {
    /// `max` is `None` when the block takes a splat parameter. `spread`
    /// allows a single array argument to be destructured across the
    /// parameters.
    pub fn new<F>(min: usize, max: Option<usize>, spread: bool, body: F) -> Self
    where
        F: Fn(&mut Env, &[Value]) -> RunResult<Value> + Send + Sync + 'static,
    {
        Self {
            min,
            max,
            spread,
            body: Arc::new(body),
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }

    pub fn spread(&self) -> bool {
        self.spread
    }

    /// `Proc#arity`: the required count when fixed, otherwise `-(min + 1)`
    pub fn arity(&self) -> i64 {
        match self.max {
            Some(max) if max == self.min => self.min as i64,
            _ => -(self.min as i64) - 1,
        }
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("spread", &self.spread)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum ProcBody {
    /// Send the captured name to the first argument
    SymbolSend(Symbol),
    Native(Block),
}

/// A callable value
#[derive(Debug, Clone)]
pub struct ProcObject {
    body: ProcBody,
    lambda: bool,
}

impl ProcObject {
    /// The proc `Symbol#to_proc` returns
    pub fn from_symbol(name: Symbol) -> Self {
        Self {
            body: ProcBody::SymbolSend(name),
            lambda: true,
        }
    }

    pub fn from_block(block: Block) -> Self {
        Self {
            body: ProcBody::Native(block),
            lambda: false,
        }
    }

    pub fn lambda(block: Block) -> Self {
        Self {
            body: ProcBody::Native(block),
            lambda: true,
        }
    }

    pub fn body(&self) -> &ProcBody {
        &self.body
    }

    pub fn is_lambda(&self) -> bool {
        self.lambda
    }

    pub fn arity(&self) -> i64 {
        match &self.body {
            ProcBody::SymbolSend(_) => -2,
            ProcBody::Native(block) => block.arity(),
        }
    }

    pub fn call(&self, env: &mut Env, args: Args<'_>) -> RunResult<Value> {
        match &self.body {
            ProcBody::SymbolSend(name) => {
                args.ensure_argc_at_least(1)?;
                log::trace!("proc send :{} to {}", name, args.at(0).class_name());
                let receiver = args.at(0).clone();
                env.send(&receiver, name, args.shift())
            }
            ProcBody::Native(block) => {
                let bound = if self.lambda {
                    match block.max {
                        Some(max) if max == block.min => args.ensure_argc_is(max)?,
                        Some(max) => args.ensure_argc_between(block.min, max)?,
                        None => args.ensure_argc_at_least(block.min)?,
                    }
                    args.to_vec()
                } else {
                    args.to_array_for_block(env, block.min, block.max, block.spread)?
                };
                (block.body)(env, &bound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::Runtime;

    fn env() -> Env {
        Env::new(Arc::new(Runtime::default()))
    }

    fn collect_block(min: usize, max: Option<usize>, spread: bool) -> Block {
        Block::new(min, max, spread, |_env, params| Ok(Value::array(params.to_vec())))
    }

    #[test]
    fn test_arity() {
        assert_eq!(collect_block(2, Some(2), true).arity(), 2);
        assert_eq!(collect_block(1, Some(2), true).arity(), -2);
        assert_eq!(collect_block(0, None, false).arity(), -1);

        let env = env();
        assert_eq!(ProcObject::from_symbol(env.intern("upcase")).arity(), -2);
    }

    #[test]
    fn test_proc_binds_loosely() {
        let mut env = env();
        let proc_object = ProcObject::from_block(collect_block(2, Some(2), true));
        let data = [Value::array(vec![1.into(), 2.into(), 3.into()])];
        let result = proc_object.call(&mut env, Args::positional(&data)).unwrap();
        assert_eq!(result, Value::array(vec![1.into(), 2.into()]));

        let result = proc_object.call(&mut env, Args::empty()).unwrap();
        assert_eq!(result, Value::array(vec![Value::Nil, Value::Nil]));
    }

    #[test]
    fn test_lambda_checks_arity() {
        let mut env = env();
        let lambda = ProcObject::lambda(collect_block(2, Some(2), true));
        let data = [Value::Integer(1)];
        let err = lambda.call(&mut env, Args::positional(&data)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityError);
        assert_eq!(err.to_string(), "wrong number of arguments (given 1, expected 2)");

        let splat = ProcObject::lambda(collect_block(1, None, false));
        let err = splat.call(&mut env, Args::empty()).unwrap_err();
        assert_eq!(err.to_string(), "wrong number of arguments (given 0, expected 1+)");
    }

    #[test]
    fn test_symbol_send_requires_receiver() {
        let mut env = env();
        let proc_object = ProcObject::from_symbol(env.intern("upcase"));
        let err = proc_object.call(&mut env, Args::empty()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArityError);
        assert_eq!(err.to_string(), "wrong number of arguments (given 0, expected 1+)");
    }
}
