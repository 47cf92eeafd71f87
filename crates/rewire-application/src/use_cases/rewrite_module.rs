//! Module rewriting use case
//!
//! Turns reads of injection-point fields into dynamically linked calls.
//!
//! 1. Scan field declarations for the injection marker and record
//!    `field index → symbolic provider name`.
//! 2. Walk every method body; replace each `GetField` on a recorded field with
//!    `InvokeDynamic { symbol, slot }`. The receiver already on the stack
//!    becomes the call's sole argument.
//!
//! Every other instruction, and every other part of the module, is left
//! untouched. Jump targets are instruction indices, so one-for-one
//! replacement preserves control flow.
//!
//! Rewrite each compiled artifact once. A second pass finds no remaining
//! `GetField` on injection points and changes nothing in this format, but
//! that is not a contract of the pipeline.

use std::collections::HashMap;

use rewire_domain::constants::INJECT_MARKER;
use rewire_domain::error::{Error, Result};
use rewire_domain::module::{self, Instruction, Module};
use rewire_domain::value_objects::InjectionPoint;
use serde::Serialize;
use tracing::{debug, trace};

/// Outcome of rewriting one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteSummary {
    /// Module name
    pub module: String,
    /// Injection points found in the field table
    pub injection_points: Vec<InjectionPoint>,
    /// Number of field reads turned into call sites
    pub rewritten_sites: usize,
}

impl RewriteSummary {
    /// Whether the module changed
    pub fn is_modified(&self) -> bool {
        self.rewritten_sites > 0
    }
}

/// Rewrites injection-point reads in RWM modules
#[derive(Debug, Clone)]
pub struct ModuleRewriter {
    inject_marker: String,
}

impl Default for ModuleRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRewriter {
    /// Rewriter recognising the standard `inject` marker
    pub fn new() -> Self {
        Self {
            inject_marker: INJECT_MARKER.to_string(),
        }
    }

    /// Recognise a different marker kind
    pub fn with_inject_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.inject_marker = marker.into();
        self
    }

    /// Marker kind this rewriter looks for
    pub fn inject_marker(&self) -> &str {
        &self.inject_marker
    }

    /// Collect the module's injection points
    pub fn scan(&self, module: &Module) -> Result<Vec<InjectionPoint>> {
        let module_name = module.name()?;
        let mut points = Vec::new();
        for (index, field) in module.fields.iter().enumerate() {
            let field_index = u16::try_from(index)
                .map_err(|_| Error::format(format!("field index {index} exceeds u16")))?;
            for marker in &field.markers {
                let (kind, symbol) = module.marker(marker)?;
                if kind == self.inject_marker {
                    points.push(InjectionPoint {
                        module: module_name.to_string(),
                        field_index,
                        slot: module.constants.str_at(field.name)?.to_string(),
                        symbol: symbol.to_string(),
                    });
                }
            }
        }
        Ok(points)
    }

    /// Rewrite `module` in place
    pub fn rewrite(&self, module: &mut Module) -> Result<RewriteSummary> {
        let points = self.scan(module)?;
        let module_name = module.name()?.to_string();

        // field index -> (symbol const, slot const)
        let mut targets: HashMap<u16, (u16, u16)> = HashMap::with_capacity(points.len());
        for point in &points {
            let symbol = module.constants.intern_str(&point.symbol)?;
            let slot = module.constants.intern_str(&point.slot)?;
            // A field marked twice keeps its last marker
            targets.insert(point.field_index, (symbol, slot));
        }

        let mut rewritten_sites = 0;
        if !targets.is_empty() {
            for method in &mut module.methods {
                for (pc, insn) in method.code.iter_mut().enumerate() {
                    if let Instruction::GetField(field) = *insn {
                        if let Some(&(symbol, slot)) = targets.get(&field) {
                            trace!(module = %module_name, pc, field, "Rewriting field read");
                            *insn = Instruction::InvokeDynamic { symbol, slot };
                            rewritten_sites += 1;
                        }
                    }
                }
            }
        }

        debug!(
            module = %module_name,
            injection_points = points.len(),
            rewritten_sites,
            "Rewrote module"
        );
        Ok(RewriteSummary {
            module: module_name,
            injection_points: points,
            rewritten_sites,
        })
    }

    /// Decode, rewrite and re-encode a module
    pub fn rewrite_bytes(&self, bytes: &[u8]) -> Result<(Vec<u8>, RewriteSummary)> {
        let mut module = module::decode(bytes)?;
        let summary = self.rewrite(&mut module)?;
        let out = module::encode(&module)?;
        Ok((out, summary))
    }
}
