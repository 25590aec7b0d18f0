use regex::{Regex, RegexBuilder};

use crate::config::RuleConfig;
use crate::error::ConfigError;

pub const DEFAULT_ACCOUNT: &str = "expenses:unknown";

#[derive(Debug, Clone)]
struct CompiledRule {
    pattern: Regex,
    account: String,
}

/// Ordered list of classification rules. When several rules match a
/// description, the one that comes last in the list decides the account.
#[derive(Debug, Clone)]
pub struct Rules {
    rules: Vec<CompiledRule>,
}

impl Rules {
    pub fn compile(rules: &[RuleConfig]) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let pattern = RegexBuilder::new(&rule.pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ConfigError::InvalidRulePattern {
                        index,
                        pattern: rule.pattern.clone(),
                        source,
                    })?;
                Ok(CompiledRule {
                    pattern,
                    account: rule.then.account2.clone(),
                })
            })
            .collect::<Result<_, ConfigError>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn classify<'a>(&'a self, description: &str) -> &'a str {
        let account = self
            .rules
            .iter()
            .fold(DEFAULT_ACCOUNT, |account, rule| {
                if rule.pattern.is_match(description) {
                    rule.account.as_str()
                } else {
                    account
                }
            });
        log::debug!("Classified {description:?} as {account}");
        account
    }
}
