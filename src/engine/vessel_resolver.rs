// ==========================================
// Offshore Logistics - Vessel Resolver
// ==========================================
// Scope: free-text transporter/vessel names → catalog vessel
// Rule (first stage with a single winner resolves):
//   1. compact form equality ("pelican island" == "pelicanisland")
//   2. token-aware alias containment, longest alias wins
//   3. compact alias containment (aliases of 6+ chars), longest wins
// A leading "M/V" / "MV" prefix is ignored. Ties stay unresolved.
// ==========================================

use crate::domain::catalog::ReferenceCatalog;
use crate::domain::records::VesselIdentity;
use crate::domain::types::VesselClass;
use crate::engine::text_match::{contains_token_sequence, tokenize};
use std::collections::BTreeMap;
use tracing::debug;

const MIN_COMPACT_CONTAINMENT_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VesselResolution {
    Resolved {
        vessel_id: String,
        in_fleet: bool,
        vessel_class: VesselClass,
    },
    Unresolved {
        raw_name: String,
    },
}

impl VesselResolution {
    pub fn vessel_id(&self) -> Option<&str> {
        match self {
            VesselResolution::Resolved { vessel_id, .. } => Some(vessel_id),
            VesselResolution::Unresolved { .. } => None,
        }
    }

    pub fn into_identity(self) -> VesselIdentity {
        match self {
            VesselResolution::Resolved {
                vessel_id,
                in_fleet,
                ..
            } => VesselIdentity::Resolved {
                vessel_id,
                in_fleet,
            },
            VesselResolution::Unresolved { raw_name } => VesselIdentity::Unresolved { raw_name },
        }
    }
}

struct VesselAlias {
    vessel_idx: usize,
    tokens: Vec<String>,
    compact: String,
}

pub struct VesselResolver<'a> {
    catalog: &'a ReferenceCatalog,
    aliases: Vec<VesselAlias>,
}

/// Drop a leading "M/V", "MV" or "RV" style prefix.
fn strip_vessel_prefix(mut tokens: Vec<String>) -> Vec<String> {
    if tokens.len() > 2 && tokens[0] == "m" && tokens[1] == "v" {
        tokens.drain(..2);
    } else if tokens.len() > 1 && matches!(tokens[0].as_str(), "mv" | "rv") {
        tokens.remove(0);
    }
    tokens
}

impl<'a> VesselResolver<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        let mut aliases = Vec::new();
        for (idx, vessel) in catalog.vessels().iter().enumerate() {
            for name in vessel.match_names() {
                let tokens = strip_vessel_prefix(tokenize(name));
                if tokens.is_empty() {
                    continue;
                }
                let compact = tokens.concat();
                aliases.push(VesselAlias {
                    vessel_idx: idx,
                    tokens,
                    compact,
                });
            }
        }
        Self { catalog, aliases }
    }

    pub fn resolve(&self, text: &str) -> VesselResolution {
        let tokens = strip_vessel_prefix(tokenize(text));
        let unresolved = || VesselResolution::Unresolved {
            raw_name: text.trim().to_string(),
        };
        if tokens.is_empty() {
            return unresolved();
        }
        let compact_input = tokens.concat();

        let exact = self.pick(|a| a.compact == compact_input);
        if let Some(result) = exact {
            return result;
        }
        let contained = self.pick(|a| contains_token_sequence(&tokens, &a.tokens));
        if let Some(result) = contained {
            return result;
        }
        let compact_contained = self.pick(|a| {
            a.compact.len() >= MIN_COMPACT_CONTAINMENT_LEN && compact_input.contains(&a.compact)
        });
        if let Some(result) = compact_contained {
            return result;
        }

        debug!(vessel = %text, "vessel unresolved, kept as third-party/unknown");
        unresolved()
    }

    /// Convenience: resolve straight into the record-level identity.
    pub fn resolve_identity(&self, text: &str) -> VesselIdentity {
        self.resolve(text).into_identity()
    }

    /// Longest alias among matches; None when nothing matches or the top is tied.
    fn pick<F: Fn(&VesselAlias) -> bool>(&self, matches: F) -> Option<VesselResolution> {
        let mut best: BTreeMap<usize, usize> = BTreeMap::new();
        for alias in self.aliases.iter().filter(|a| matches(a)) {
            let len = best.entry(alias.vessel_idx).or_insert(0);
            *len = (*len).max(alias.compact.len());
        }
        let max_len = *best.values().max()?;
        let top: Vec<usize> = best
            .into_iter()
            .filter(|(_, len)| *len == max_len)
            .map(|(idx, _)| idx)
            .collect();
        if top.len() != 1 {
            return None;
        }
        let vessel = &self.catalog.vessels()[top[0]];
        Some(VesselResolution::Resolved {
            vessel_id: vessel.vessel_id.clone(),
            in_fleet: vessel.in_fleet,
            vessel_class: vessel.vessel_class,
        })
    }
}
