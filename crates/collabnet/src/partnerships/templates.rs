use std::collections::BTreeMap;

/// A reusable contract skeleton. `default_terms` seeds the materialized
/// contract's term map; caller custom terms win on key collision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub agreement_type: &'static str,
    pub default_deliverables: &'static [&'static str],
    pub default_terms: &'static [(&'static str, &'static str)],
}

impl ContractTemplate {
    pub fn terms(&self) -> BTreeMap<String, String> {
        self.default_terms
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect()
    }
}

/// The built-in template catalogue.
#[derive(Debug, Clone)]
pub struct ContractTemplateRegistry {
    templates: Vec<ContractTemplate>,
}

impl ContractTemplateRegistry {
    /// The three stock agreements every deployment starts with.
    pub fn standard() -> Self {
        Self {
            templates: vec![
                ContractTemplate {
                    id: "music_promotion",
                    name: "Music Promotion Campaign",
                    agreement_type: "promotion",
                    default_deliverables: &[
                        "Instagram post",
                        "Story mention",
                        "Song feature in content",
                    ],
                    default_terms: &[
                        ("timeline", "7 days"),
                        ("exclusivity", "Non-exclusive"),
                        ("usage_rights", "Perpetual license for promotional use"),
                        ("payment_structure", "Fixed fee + performance bonus"),
                    ],
                },
                ContractTemplate {
                    id: "playlist_placement",
                    name: "Playlist Feature Agreement",
                    agreement_type: "playlist",
                    default_deliverables: &[
                        "Playlist inclusion",
                        "Playlist promotion",
                        "Social media mention",
                    ],
                    default_terms: &[
                        ("timeline", "30 days minimum"),
                        ("exclusivity", "Exclusive for genre"),
                        ("usage_rights", "Streaming rights only"),
                        ("payment_structure", "Revenue share"),
                    ],
                },
                ContractTemplate {
                    id: "content_collaboration",
                    name: "Content Collaboration",
                    agreement_type: "collaboration",
                    default_deliverables: &[
                        "Original content creation",
                        "Cross-promotion",
                        "Behind-the-scenes content",
                    ],
                    default_terms: &[
                        ("timeline", "14 days"),
                        ("exclusivity", "Exclusive during campaign"),
                        ("usage_rights", "Shared ownership"),
                        ("payment_structure", "Profit sharing"),
                    ],
                },
            ],
        }
    }

    pub fn get(&self, template_id: &str) -> Option<&ContractTemplate> {
        self.templates
            .iter()
            .find(|template| template.id == template_id)
    }

    pub fn all(&self) -> &[ContractTemplate] {
        &self.templates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalogue_carries_the_three_stock_templates() {
        let registry = ContractTemplateRegistry::standard();
        assert_eq!(registry.all().len(), 3);
        for id in ["music_promotion", "playlist_placement", "content_collaboration"] {
            assert!(registry.get(id).is_some(), "missing template {id}");
        }
        assert!(registry.get("ghostwriting").is_none());
    }

    #[test]
    fn template_terms_are_materialized_as_owned_maps() {
        let registry = ContractTemplateRegistry::standard();
        let template = registry.get("music_promotion").unwrap();
        let terms = template.terms();
        assert_eq!(terms.get("timeline").map(String::as_str), Some("7 days"));
        assert_eq!(terms.len(), 4);
    }
}
