// ==========================================
// Offshore Logistics - Location Resolver
// ==========================================
// Scope: free-text rig/location references → canonical facility
// Rule: ranked alias match
//   1. aliases are matched token-aware (whole tokens, contiguous)
//   2. longest matching alias wins
//   3. tie → the facility sharing a qualifier token with the input
//      (drilling / prod / production ...) wins
//   4. still tied → unresolved (never guess)
// ==========================================

use crate::domain::catalog::ReferenceCatalog;
use crate::domain::types::FacilityType;
use crate::engine::text_match::{contains_token_sequence, tokenize};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Tokens that qualify an operational identity of a shared physical asset.
pub const QUALIFIER_TOKENS: &[&str] = &["drilling", "drill", "prod", "production", "pdq"];

fn type_qualifiers(facility_type: FacilityType) -> &'static [&'static str] {
    match facility_type {
        FacilityType::DrillingRig => &["drilling", "drill"],
        FacilityType::ProductionPlatform => &["prod", "production", "pdq"],
        FacilityType::Integrated => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LocationResolution {
    Resolved {
        facility_id: String,
        matched_alias: String,
    },
    Unresolved {
        reason: UnresolvedReason,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnresolvedReason {
    EmptyInput,
    NoMatch,
    Ambiguous { candidates: Vec<String> },
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::EmptyInput => write!(f, "empty location"),
            UnresolvedReason::NoMatch => write!(f, "no facility alias matches"),
            UnresolvedReason::Ambiguous { candidates } => {
                write!(f, "ambiguous location, candidates: {}", candidates.join(", "))
            }
        }
    }
}

impl LocationResolution {
    pub fn facility_id(&self) -> Option<&str> {
        match self {
            LocationResolution::Resolved { facility_id, .. } => Some(facility_id),
            LocationResolution::Unresolved { .. } => None,
        }
    }
}

struct AliasEntry {
    facility_idx: usize,
    tokens: Vec<String>,
    normalized: String,
}

// ==========================================
// LocationResolver
// ==========================================
pub struct LocationResolver<'a> {
    catalog: &'a ReferenceCatalog,
    aliases: Vec<AliasEntry>,
    qualifiers: Vec<BTreeSet<String>>,
}

impl<'a> LocationResolver<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        let mut aliases = Vec::new();
        let mut qualifiers = Vec::with_capacity(catalog.facilities().len());

        for (idx, facility) in catalog.facilities().iter().enumerate() {
            let mut facility_qualifiers: BTreeSet<String> = type_qualifiers(facility.facility_type)
                .iter()
                .map(|q| q.to_string())
                .collect();
            let mut seen = BTreeSet::new();

            let names = facility
                .match_names()
                .chain(std::iter::once(facility.facility_id.as_str()));
            for name in names {
                let tokens = tokenize(name);
                if tokens.is_empty() {
                    continue;
                }
                for t in &tokens {
                    if QUALIFIER_TOKENS.contains(&t.as_str()) {
                        facility_qualifiers.insert(t.clone());
                    }
                }
                let normalized = tokens.join(" ");
                if seen.insert(normalized.clone()) {
                    aliases.push(AliasEntry {
                        facility_idx: idx,
                        tokens,
                        normalized,
                    });
                }
            }
            qualifiers.push(facility_qualifiers);
        }

        Self {
            catalog,
            aliases,
            qualifiers,
        }
    }

    /// Resolve free text to a facility id.
    pub fn resolve(&self, text: &str) -> LocationResolution {
        let input = tokenize(text);
        if input.is_empty() {
            return LocationResolution::Unresolved {
                reason: UnresolvedReason::EmptyInput,
            };
        }

        // longest matching alias per facility
        let mut best: BTreeMap<usize, &AliasEntry> = BTreeMap::new();
        for alias in &self.aliases {
            if !contains_token_sequence(&input, &alias.tokens) {
                continue;
            }
            let entry = best.entry(alias.facility_idx).or_insert(alias);
            if alias.normalized.len() > entry.normalized.len() {
                *entry = alias;
            }
        }

        let Some(max_len) = best.values().map(|a| a.normalized.len()).max() else {
            debug!(location = %text, "location unresolved: no alias match");
            return LocationResolution::Unresolved {
                reason: UnresolvedReason::NoMatch,
            };
        };

        let longest: Vec<(usize, &AliasEntry)> = best
            .into_iter()
            .filter(|(_, a)| a.normalized.len() == max_len)
            .collect();

        if longest.len() == 1 {
            return self.resolved(longest[0].0, longest[0].1);
        }

        // qualifier tie-break
        let input_qualifiers: BTreeSet<&str> = input
            .iter()
            .map(String::as_str)
            .filter(|t| QUALIFIER_TOKENS.contains(t))
            .collect();
        let qualified: Vec<&(usize, &AliasEntry)> = longest
            .iter()
            .filter(|(idx, _)| {
                self.qualifiers[*idx]
                    .iter()
                    .any(|q| input_qualifiers.contains(q.as_str()))
            })
            .collect();

        if qualified.len() == 1 {
            return self.resolved(qualified[0].0, qualified[0].1);
        }

        let tied: Vec<&(usize, &AliasEntry)> = if qualified.is_empty() {
            longest.iter().collect()
        } else {
            qualified
        };
        let candidates: Vec<String> = tied
            .iter()
            .map(|(idx, _)| self.catalog.facilities()[*idx].facility_id.clone())
            .collect();
        debug!(location = %text, candidates = ?candidates, "location unresolved: tie");
        LocationResolution::Unresolved {
            reason: UnresolvedReason::Ambiguous { candidates },
        }
    }

    fn resolved(&self, idx: usize, alias: &AliasEntry) -> LocationResolution {
        LocationResolution::Resolved {
            facility_id: self.catalog.facilities()[idx].facility_id.clone(),
            matched_alias: alias.normalized.clone(),
        }
    }
}
