//! Stack-machine interpreter for loaded modules
//!
//! `InvokeDynamic` instructions execute through their [`CallSite`]: linked on
//! first execution via the interpreter's [`LinkageResolver`], invoked directly
//! afterwards.
//!
//! [`CallSite`]: crate::injection::CallSite

use rewire_domain::error::{Error, Result};
use rewire_domain::module::Instruction;
use rewire_domain::value_objects::{Instance, Value};
use tracing::trace;

use super::loader::{CallSiteId, LoadedModule};
use crate::injection::LinkageResolver;

/// Default bound on executed instructions per invocation
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Executes methods of loaded modules
#[derive(Debug, Clone)]
pub struct Interpreter {
    resolver: LinkageResolver,
    step_limit: usize,
}

impl Interpreter {
    /// Interpreter linking call sites through `resolver`
    pub fn new(resolver: LinkageResolver) -> Self {
        Self {
            resolver,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Bound the number of instructions a single invocation may execute
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    /// The resolver used for call-site linkage
    pub fn resolver(&self) -> &LinkageResolver {
        &self.resolver
    }

    /// Invoke `method` on `receiver` with `args`
    pub fn invoke(
        &self,
        loaded: &LoadedModule,
        method: &str,
        receiver: Value,
        args: &[Value],
    ) -> Result<Value> {
        let (method_index, decl) = loaded.method(method)?;
        if args.len() != usize::from(decl.params) {
            return Err(Error::runtime(format!(
                "{}.{method} expects {} argument(s), got {}",
                loaded.name(),
                decl.params,
                args.len()
            )));
        }

        let mut locals = vec![Value::Null; decl.frame_size()];
        locals[0] = receiver;
        locals[1..=args.len()].clone_from_slice(args);
        let mut stack: Vec<Value> = Vec::new();
        let mut pc = 0usize;
        let mut steps = 0usize;

        let frame = Frame {
            loaded,
            method,
        };

        while let Some(insn) = decl.code.get(pc) {
            steps += 1;
            if steps > self.step_limit {
                return Err(frame.error(pc, format!("step limit {} exceeded", self.step_limit)));
            }
            trace!(module = loaded.name(), method, pc, %insn, "exec");
            let mut next = pc + 1;
            match *insn {
                Instruction::Nop => {}
                Instruction::PushNull => stack.push(Value::Null),
                Instruction::PushInt(value) => stack.push(Value::Int(value)),
                Instruction::PushConst(index) => {
                    let value = match loaded.module().constants.get(index) {
                        Some(rewire_domain::module::Constant::Str(s)) => Value::str(s),
                        Some(rewire_domain::module::Constant::Int(i)) => Value::Int(*i),
                        None => return Err(frame.error(pc, format!("constant #{index} missing"))),
                    };
                    stack.push(value);
                }
                Instruction::LoadLocal(slot) => stack.push(locals[usize::from(slot)].clone()),
                Instruction::StoreLocal(slot) => {
                    locals[usize::from(slot)] = frame.pop(&mut stack, pc)?;
                }
                Instruction::GetField(field) => {
                    let object = frame.pop(&mut stack, pc)?;
                    let instance = frame.instance(&object, pc)?;
                    stack.push(instance.get_field(usize::from(field))?);
                }
                Instruction::PutField(field) => {
                    let value = frame.pop(&mut stack, pc)?;
                    let object = frame.pop(&mut stack, pc)?;
                    let instance = frame.instance(&object, pc)?;
                    instance.set_field(usize::from(field), value)?;
                }
                Instruction::Add => {
                    let b = frame.pop(&mut stack, pc)?;
                    let a = frame.pop(&mut stack, pc)?;
                    let sum = match (a.as_int(), b.as_int()) {
                        (Some(a), Some(b)) => a
                            .checked_add(b)
                            .ok_or_else(|| frame.error(pc, "integer overflow".to_string()))?,
                        _ => {
                            return Err(frame.error(
                                pc,
                                format!("cannot add {} and {}", a.type_name(), b.type_name()),
                            ));
                        }
                    };
                    stack.push(Value::Int(sum));
                }
                Instruction::Concat => {
                    let b = frame.pop(&mut stack, pc)?;
                    let a = frame.pop(&mut stack, pc)?;
                    stack.push(Value::from(format!("{a}{b}")));
                }
                Instruction::InvokeDynamic { .. } => {
                    let receiver = frame.pop(&mut stack, pc)?;
                    let id = CallSiteId {
                        method: method_index,
                        pc,
                    };
                    let site = loaded
                        .call_site(id)
                        .ok_or_else(|| frame.error(pc, "call site not loaded".to_string()))?;
                    stack.push(site.invoke(&receiver, &self.resolver)?);
                }
                Instruction::Pop => {
                    frame.pop(&mut stack, pc)?;
                }
                Instruction::Dup => {
                    let top = stack
                        .last()
                        .cloned()
                        .ok_or_else(|| frame.error(pc, "stack underflow".to_string()))?;
                    stack.push(top);
                }
                Instruction::Jump(target) => next = target as usize,
                Instruction::JumpIfNull(target) => {
                    if frame.pop(&mut stack, pc)?.is_null() {
                        next = target as usize;
                    }
                }
                Instruction::Return => return frame.pop(&mut stack, pc),
            }
            pc = next;
        }

        Err(frame.error(pc, "fell off the end of the method".to_string()))
    }
}

/// Diagnostic context of one invocation
struct Frame<'a> {
    loaded: &'a LoadedModule,
    method: &'a str,
}

impl Frame<'_> {
    fn error(&self, pc: usize, message: String) -> Error {
        Error::runtime(format!("{}.{}[{pc}]: {message}", self.loaded.name(), self.method))
    }

    fn pop(&self, stack: &mut Vec<Value>, pc: usize) -> Result<Value> {
        stack
            .pop()
            .ok_or_else(|| self.error(pc, "stack underflow".to_string()))
    }

    fn instance<'v>(&self, value: &'v Value, pc: usize) -> Result<&'v Instance> {
        match value {
            Value::Object(instance) if instance.module() == self.loaded.name() => Ok(&**instance),
            Value::Object(instance) => Err(self.error(
                pc,
                format!(
                    "field access on '{}' instance, expected '{}'",
                    instance.module(),
                    self.loaded.name()
                ),
            )),
            other => Err(self.error(
                pc,
                format!("field access on {} receiver", other.type_name()),
            )),
        }
    }
}
