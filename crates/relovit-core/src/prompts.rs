//! Prompt templates for each enrichment task.
//!
//! Templates are plain strings with `{placeholder}` markers. They are filled
//! from the caller's [`PromptConfig`] and the product name; unknown markers
//! are left untouched so a typo in a custom template shows up in the prompt
//! instead of silently vanishing.

use crate::config::PromptConfig;
use serde::{Deserialize, Serialize};

/// Template strings for every task, overridable from `[prompts.templates]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    pub identify: String,
    pub description: String,
    pub price: String,
    pub taxonomy: String,
    pub image: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            identify: "Listez tous les objets distincts et vendables présents dans cette image. \
                       Répondez uniquement avec une liste d'éléments séparés par des virgules."
                .to_string(),
            description: "{store_context} Rédige en {language} une description {desc_tone} \
                          pour le produit « {product_name} » visible sur ces photos, \
                          {desc_keywords}. Réponds uniquement avec la description, sans titre."
                .to_string(),
            price: "{store_context} En te basant sur ces photos du produit « {product_name} », \
                    propose {price_range}. Réponds uniquement avec un nombre décimal en euros, \
                    sans symbole monétaire ni texte."
                .to_string(),
            taxonomy: "{store_context} Pour le produit « {product_name} » visible sur ces photos, \
                       propose en {language} une catégorie et des étiquettes {taxonomy_seo_focus}. \
                       Réponds uniquement avec un objet JSON de la forme \
                       {\"category\": [\"Parent\", \"Enfant\"], \"tags\": [\"étiquette\"]}, \
                       où category est le chemin de catégories du plus général au plus précis."
                .to_string(),
            image: "Génère une photo produit professionnelle de l'objet principal de cette image, \
                    {image_bg_style}. Conserve fidèlement la forme, les couleurs et l'état de l'objet."
                .to_string(),
        }
    }
}

/// Price positioning requested from the AI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceRange {
    Low,
    #[default]
    Medium,
    High,
}

impl PriceRange {
    /// Parse a range key (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Parse a range key, falling back to `Medium` for unknown values.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Wording substituted for `{price_range}`.
    pub fn prompt_text(&self) -> &'static str {
        match self {
            Self::Low => "un prix attractif et bon marché, visant une vente rapide",
            Self::Medium => "un prix de vente compétitif et raisonnable par rapport au marché actuel",
            Self::High => "un prix dans la fourchette haute du marché, reflétant une qualité ou une rareté supérieure",
        }
    }
}

/// Substitute `{key}` markers in `template` with the given values.
///
/// The template is scanned once. Substituted values are copied verbatim and
/// never scanned again, so a product name containing `{language}` reaches the
/// model unchanged. Braces that do not form a known marker (such as the JSON
/// example in the taxonomy prompt) are kept as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let marker = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });

        match marker {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Builds task prompts from a [`PromptConfig`].
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    config: PromptConfig,
}

impl PromptBuilder {
    pub fn new(config: PromptConfig) -> Self {
        Self { config }
    }

    pub fn identify(&self) -> String {
        render(&self.config.templates.identify, &self.common_vars(""))
    }

    pub fn description(&self, product_name: &str) -> String {
        render(
            &self.config.templates.description,
            &self.common_vars(product_name),
        )
    }

    /// `price_range` overrides the configured default when given.
    pub fn price(&self, product_name: &str, price_range: Option<PriceRange>) -> String {
        let range =
            price_range.unwrap_or_else(|| PriceRange::parse_or_default(&self.config.price_range));
        let mut vars = self.common_vars(product_name);
        vars.push(("price_range", range.prompt_text()));
        render(&self.config.templates.price, &vars)
    }

    pub fn taxonomy(&self, product_name: &str) -> String {
        render(
            &self.config.templates.taxonomy,
            &self.common_vars(product_name),
        )
    }

    pub fn image(&self) -> String {
        render(&self.config.templates.image, &self.common_vars(""))
    }

    fn common_vars<'a>(&'a self, product_name: &'a str) -> Vec<(&'a str, &'a str)> {
        vec![
            ("product_name", product_name),
            ("language", self.config.language.as_str()),
            ("store_context", self.config.store_context.as_str()),
            ("desc_tone", self.config.desc_tone.as_str()),
            ("desc_keywords", self.config.desc_keywords.as_str()),
            ("taxonomy_seo_focus", self.config.taxonomy_seo_focus.as_str()),
            ("image_bg_style", self.config.image_bg_style.as_str()),
        ]
    }
}
