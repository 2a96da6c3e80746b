//! Conversation assembly for the understanding service.
//!
//! The message sequence is a pure function of its inputs: catalog order,
//! prompt insertion order and the sorted seen set fully determine the output.

pub mod policy;

use std::collections::BTreeSet;

use refine_llm::Message;

use crate::catalog::{CatalogItem, SimplifiedItem};

/// Everything one request's context is built from.
#[derive(Debug, Clone, Copy)]
pub struct ContextInput<'a> {
    pub catalog: &'a [CatalogItem],
    pub prior_prompts: &'a [String],
    pub seen_ids: &'a BTreeSet<String>,
    pub query: &'a str,
}

#[derive(Debug, Clone)]
pub struct ContextBuilder {
    policy: Vec<String>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self {
            policy: policy::POLICY_INSTRUCTIONS
                .iter()
                .map(|line| line.to_string())
                .collect(),
        }
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the fixed policy messages.
    pub fn with_policy(mut self, policy: Vec<String>) -> Self {
        self.policy = policy;
        self
    }

    /// Builds, in order: catalog snapshot, prior queries, seen set, the new
    /// query, then the policy messages.
    pub fn build(&self, input: &ContextInput<'_>) -> Vec<Message> {
        let mut messages = Vec::with_capacity(input.prior_prompts.len() + self.policy.len() + 3);

        let catalog: Vec<SimplifiedItem<'_>> =
            input.catalog.iter().map(CatalogItem::simplified).collect();
        messages.push(Message::system(format!(
            "Product catalog (JSON): {}",
            to_json(&catalog)
        )));

        for prompt in input.prior_prompts {
            messages.push(query_turn(prompt));
        }

        let seen: Vec<SimplifiedItem<'_>> = if input.seen_ids.is_empty() {
            catalog
        } else {
            input
                .catalog
                .iter()
                .filter(|item| input.seen_ids.contains(&item.id))
                .map(CatalogItem::simplified)
                .collect()
        };
        messages.push(Message::system(format!(
            "Products shown after the previous query (JSON): {}",
            to_json(&seen)
        )));

        messages.push(query_turn(input.query));

        messages.extend(self.policy.iter().map(Message::system));
        messages
    }
}

fn query_turn(query: &str) -> Message {
    Message::user(format!("The query is: {query}"))
}

fn to_json(items: &[SimplifiedItem<'_>]) -> String {
    // Plain string/number structs always serialize.
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refine_llm::Role;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("fall-jacket", "Fall Jacket", "Warm layer", 120.0),
            CatalogItem::new("summer-tee", "Summer Tee", "Light cotton", 20.0),
            CatalogItem::new("mens-fall-boot", "Men's Fall Boot", "Leather", 150.0),
        ]
    }

    fn seen(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn orders_sections() {
        let catalog = catalog();
        let prompts = vec!["fall".to_string(), "men".to_string()];
        let seen_ids = seen(&["mens-fall-boot"]);
        let messages = ContextBuilder::new().build(&ContextInput {
            catalog: &catalog,
            prior_prompts: &prompts,
            seen_ids: &seen_ids,
            query: "under 200",
        });

        assert_eq!(messages.len(), 5 + policy::POLICY_INSTRUCTIONS.len());
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.starts_with("Product catalog (JSON): [{\"id\":\"fall-jacket\""));
        assert_eq!(messages[1], Message::user("The query is: fall"));
        assert_eq!(messages[2], Message::user("The query is: men"));
        assert_eq!(
            messages[3].content,
            "Products shown after the previous query (JSON): \
             [{\"id\":\"mens-fall-boot\",\"title\":\"Men's Fall Boot\",\"description\":\"Leather\",\"price\":150.0}]"
        );
        assert_eq!(messages[4], Message::user("The query is: under 200"));
        assert_eq!(messages[5], Message::system(policy::SALES_AGENT));
        assert_eq!(
            messages.last().map(|message| message.content.as_str()),
            Some(policy::OUTPUT_FORMAT)
        );
    }

    #[test]
    fn missing_seen_set_uses_full_catalog() {
        let catalog = catalog();
        let seen_ids = BTreeSet::new();
        let messages = ContextBuilder::new().build(&ContextInput {
            catalog: &catalog,
            prior_prompts: &[],
            seen_ids: &seen_ids,
            query: "fall",
        });
        let catalog_json = messages[0]
            .content
            .trim_start_matches("Product catalog (JSON): ");
        let seen_json = messages[1]
            .content
            .trim_start_matches("Products shown after the previous query (JSON): ");
        assert_eq!(catalog_json, seen_json);
    }

    #[test]
    fn identical_inputs_build_identical_messages() {
        let catalog = catalog();
        let prompts = vec!["fall".to_string()];
        let first_seen = seen(&["summer-tee", "fall-jacket"]);
        let second_seen = seen(&["fall-jacket", "summer-tee"]);
        let builder = ContextBuilder::new();

        let first = builder.build(&ContextInput {
            catalog: &catalog,
            prior_prompts: &prompts,
            seen_ids: &first_seen,
            query: "men",
        });
        let second = builder.build(&ContextInput {
            catalog: &catalog,
            prior_prompts: &prompts,
            seen_ids: &second_seen,
            query: "men",
        });
        assert_eq!(
            serde_json::to_vec(&first).expect("serialize"),
            serde_json::to_vec(&second).expect("serialize")
        );
    }

    #[test]
    fn custom_policy_replaces_defaults() {
        let catalog = catalog();
        let seen_ids = BTreeSet::new();
        let messages = ContextBuilder::new()
            .with_policy(vec!["only this".to_string()])
            .build(&ContextInput {
                catalog: &catalog,
                prior_prompts: &[],
                seen_ids: &seen_ids,
                query: "fall",
            });
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3], Message::system("only this"));
    }
}
