//! Shopping assistant.
//!
//! [`ShoppingAssistant`] is the seam the rest of the storefront talks to.
//! [`MockAssistant`] is the only implementation: there is no model behind it.
//! With an API key configured it answers with canned model output after a
//! simulated latency; without one every call that needs the model falls back
//! to a fixed answer.
//!
//! Randomized answers (chat replies, recommendation scores) come from an
//! injected [`Rng`] so callers can pin them.

pub mod prompts;

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use techstore_core::{ChatMessageId, ChatRole, ProductId, RecommendationKind};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use self::prompts::{CUSTOMER_SERVICE, PRODUCT_DESCRIPTION, PromptCategory, PromptTemplate};
use self::prompts::{RECOMMENDATIONS, SEMANTIC_SEARCH};
use crate::catalog::Product;
use crate::config::AssistantConfig;

/// First message of every chat.
pub const GREETING: &str = "¡Hola! 👋 Soy tu asistente virtual de E-Commerce. Estoy aquí para ayudarte con cualquier pregunta sobre productos, envíos, garantías y más. ¿En qué puedo ayudarte hoy? 😊";

/// Suggested openers shown under the chat input.
pub const QUICK_QUESTIONS: &[&str] = &[
    "🛍️ ¿Qué productos tienen en oferta?",
    "📦 ¿Cómo funciona el envío gratuito?",
    "🔄 ¿Cuál es la política de devoluciones?",
    "💳 ¿Qué métodos de pago aceptan?",
    "🎯 ¿Pueden recomendarme un producto?",
    "📞 ¿Cómo contacto con soporte técnico?",
];

/// Replies used when no model is configured.
pub const CANNED_REPLIES: &[&str] = &[
    "¡Por supuesto! 😊 Estoy aquí para ayudarte con cualquier pregunta sobre nuestros productos tecnológicos.",
    "🔍 Tenemos una gran variedad de productos. ¿Buscas algo específico como laptops, smartphones o accesorios?",
    "📦 Te puedo ayudar con información sobre envíos, devoluciones, especificaciones técnicas y más.",
    "🛠️ Si necesitas soporte técnico especializado, puedo conectarte con nuestro equipo de expertos.",
    "✨ Nuestros productos incluyen garantía completa y soporte 24/7. ¿Te interesa algún producto en particular?",
    "💳 También puedo ayudarte con el proceso de compra, métodos de pago y seguimiento de pedidos.",
    "🎯 ¿Necesitas recomendaciones personalizadas? Puedo sugerirte productos según tus necesidades.",
    "📞 Para consultas específicas, nuestro equipo está disponible las 24 horas. ¿En qué más puedo asistirte?",
];

const MODEL_DESCRIPTION: &str = "Descubre este increíble producto que transformará tu experiencia. Con tecnología de vanguardia y diseño elegante, ofrece:
• Calidad superior garantizada
• Fácil de usar y mantener
• Excelente relación calidad-precio
¡Añádelo a tu carrito y disfruta de envío gratis!";

const MODEL_CHAT_REPLY: &str = "¡Hola! 👋 Estoy aquí para ayudarte. ¿En qué puedo asistirte hoy? Puedo ayudarte con información de productos, envíos, devoluciones y más.";

const MODEL_GENERIC: &str = "Respuesta generada por IA";

const AI_RECOMMENDATION_REASON: &str = "Recomendado por tu historial de navegación";
const FALLBACK_RECOMMENDATION_REASON: &str = "Producto popular entre nuestros clientes";

const AI_RECOMMENDATIONS: usize = 5;
const FALLBACK_RECOMMENDATIONS: usize = 3;
const PROMPT_PRODUCT_LIMIT: usize = 20;
const SEARCH_PRODUCT_LIMIT: usize = 10;

/// Errors from the shopping assistant.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Message is empty")]
    EmptyMessage,

    /// No API key; callers fall back to fixed answers.
    #[error("Assistant API key not configured")]
    NotConfigured,

    #[error("Assistant RNG lock poisoned")]
    LockPoisoned,
}

/// A product suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub product_id: ProductId,
    pub product_name: String,
    /// Relevance, 1-10.
    pub score: u8,
    pub reason: String,
    pub kind: RecommendationKind,
}

/// Accepted price range for recommendations. `max: None` means no limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Option<Decimal>,
}

/// What the assistant knows about the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub viewed_products: Vec<String>,
    pub cart_products: Vec<String>,
    pub preferred_categories: Vec<String>,
    pub price_range: PriceRange,
    pub purchase_history: Vec<String>,
}

/// A rewritten search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchEnhancement {
    pub enhanced_query: String,
    pub suggestions: Vec<String>,
    pub semantic_matches: Vec<ProductId>,
}

impl SearchEnhancement {
    /// The query unchanged, with no suggestions.
    #[must_use]
    pub fn passthrough(query: &str) -> Self {
        Self {
            enhanced_query: query.to_owned(),
            ..Self::default()
        }
    }
}

/// Shopping assistant operations.
pub trait ShoppingAssistant: Send + Sync {
    /// Persuasive description for a product.
    fn generate_description(
        &self,
        product: &Product,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;

    /// Reply to a customer message.
    ///
    /// Fails with [`AssistantError::EmptyMessage`] for blank input.
    fn chat(&self, message: &str) -> impl Future<Output = Result<String, AssistantError>> + Send;

    /// Products to suggest to `profile`, best first.
    fn recommend(
        &self,
        profile: &UserProfile,
        products: &[Product],
    ) -> impl Future<Output = Result<Vec<Recommendation>, AssistantError>> + Send;

    /// Rewrite a search query.
    fn enhance_search(
        &self,
        query: &str,
        products: &[Product],
    ) -> impl Future<Output = Result<SearchEnhancement, AssistantError>> + Send;
}

/// Canned assistant.
///
/// Implements `Debug` manually to keep the RNG and key out of logs.
pub struct MockAssistant<R = StdRng> {
    api_key: Option<SecretString>,
    latency: Duration,
    rng: Mutex<R>,
}

impl<R> std::fmt::Debug for MockAssistant<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAssistant")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

impl MockAssistant<StdRng> {
    /// Assistant with an entropy-seeded RNG.
    #[must_use]
    pub fn new(config: &AssistantConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Assistant whose random choices repeat for the same seed.
    #[must_use]
    pub fn seeded(config: &AssistantConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send + 'static> MockAssistant<R> {
    #[must_use]
    pub fn with_rng(config: &AssistantConfig, rng: R) -> Self {
        Self {
            api_key: config.api_key.clone(),
            latency: config.latency,
            rng: Mutex::new(rng),
        }
    }

    /// Whether a model is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn roll(&self, upper: usize) -> Result<usize, AssistantError> {
        let mut rng = self.rng.lock().map_err(|_| AssistantError::LockPoisoned)?;
        Ok(rng.random_range(0..upper))
    }

    /// Simulated model call.
    async fn complete(
        &self,
        template: &PromptTemplate,
        prompt: &str,
    ) -> Result<String, AssistantError> {
        if self.api_key.is_none() {
            return Err(AssistantError::NotConfigured);
        }
        debug!(template = template.id, prompt_len = prompt.len(), "Calling model");
        tokio::time::sleep(self.latency).await;
        let response = match template.category {
            PromptCategory::ProductDescription => MODEL_DESCRIPTION,
            PromptCategory::Chatbot => MODEL_CHAT_REPLY,
            PromptCategory::Recommendation | PromptCategory::Search => MODEL_GENERIC,
        };
        Ok(response.to_owned())
    }
}

/// Description used when the model is unavailable.
#[must_use]
pub fn fallback_description(product: &Product) -> String {
    format!(
        "{} - Un producto de calidad en la categoría {}. Perfecto para quienes buscan una solución confiable y eficiente. ¡Descubre todas sus características y beneficios!",
        product.name, product.category
    )
}

/// Recommendations used when the model is unavailable.
#[must_use]
pub fn fallback_recommendations(products: &[Product]) -> Vec<Recommendation> {
    products
        .iter()
        .take(FALLBACK_RECOMMENDATIONS)
        .map(|product| Recommendation {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            score: 8,
            reason: FALLBACK_RECOMMENDATION_REASON.to_owned(),
            kind: RecommendationKind::Trending,
        })
        .collect()
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_owned()
    } else {
        items.join(", ")
    }
}

fn product_listing(products: &[Product], limit: usize) -> String {
    products
        .iter()
        .take(limit)
        .map(|p| format!("{} - ${}", p.name, p.price))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelSearchResponse {
    enhanced_query: String,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    matching_products: Vec<String>,
}

/// Read a model's JSON search answer, matching product names
/// case-insensitively. Anything unparseable yields [`SearchEnhancement::passthrough`].
#[must_use]
pub fn parse_search_response(response: &str, query: &str, products: &[Product]) -> SearchEnhancement {
    let Ok(parsed) = serde_json::from_str::<ModelSearchResponse>(response) else {
        return SearchEnhancement::passthrough(query);
    };
    let needles: Vec<String> = parsed
        .matching_products
        .iter()
        .map(|m| m.to_lowercase())
        .collect();
    let semantic_matches = products
        .iter()
        .filter(|p| {
            let name = p.name.to_lowercase();
            needles.iter().any(|n| name.contains(n.as_str()))
        })
        .map(|p| p.id.clone())
        .collect();
    SearchEnhancement {
        enhanced_query: parsed.enhanced_query,
        suggestions: parsed.suggestions,
        semantic_matches,
    }
}

impl<R: Rng + Send + 'static> ShoppingAssistant for MockAssistant<R> {
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn generate_description(&self, product: &Product) -> Result<String, AssistantError> {
        let features = if product.tags.is_empty() {
            "Características no especificadas".to_owned()
        } else {
            product.tags.join(", ")
        };
        let price = product.price.to_string();
        let prompt = PRODUCT_DESCRIPTION.render(&[
            ("productName", product.name.as_str()),
            ("category", product.category.as_str()),
            ("features", features.as_str()),
            ("price", price.as_str()),
            ("targetAudience", "Consumidores generales"),
        ]);

        match self.complete(&PRODUCT_DESCRIPTION, &prompt).await {
            Ok(text) => Ok(text),
            Err(AssistantError::NotConfigured) => {
                warn!("No model configured, using fallback description");
                Ok(fallback_description(product))
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, message), fields(message_len = message.len()))]
    async fn chat(&self, message: &str) -> Result<String, AssistantError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        if self.is_configured() {
            let prompt = CUSTOMER_SERVICE.render(&[
                ("userMessage", message),
                ("context", "{}"),
                ("relatedProducts", "Ninguno"),
            ]);
            return self.complete(&CUSTOMER_SERVICE, &prompt).await;
        }

        tokio::time::sleep(self.latency).await;
        let pick = self.roll(CANNED_REPLIES.len())?;
        let reply = CANNED_REPLIES.get(pick).copied().unwrap_or(MODEL_CHAT_REPLY);
        Ok(reply.to_owned())
    }

    #[instrument(skip_all, fields(products = products.len()))]
    async fn recommend(
        &self,
        profile: &UserProfile,
        products: &[Product],
    ) -> Result<Vec<Recommendation>, AssistantError> {
        let price_range = format!(
            "{} - {}",
            profile.price_range.min,
            profile
                .price_range
                .max
                .map_or_else(|| "Sin límite".to_owned(), |max| max.to_string())
        );
        let viewed = join_or(&profile.viewed_products, "Ninguno");
        let cart = join_or(&profile.cart_products, "Ninguno");
        let categories = join_or(&profile.preferred_categories, "Todas");
        let history = join_or(&profile.purchase_history, "Sin historial");
        let listing = product_listing(products, PROMPT_PRODUCT_LIMIT);
        let prompt = RECOMMENDATIONS.render(&[
            ("viewedProducts", viewed.as_str()),
            ("cartProducts", cart.as_str()),
            ("preferredCategories", categories.as_str()),
            ("priceRange", price_range.as_str()),
            ("purchaseHistory", history.as_str()),
            ("availableProducts", listing.as_str()),
        ]);

        match self.complete(&RECOMMENDATIONS, &prompt).await {
            Ok(_) => products
                .iter()
                .take(AI_RECOMMENDATIONS)
                .map(|product| {
                    let penalty = u8::try_from(self.roll(3)?).unwrap_or(0);
                    Ok(Recommendation {
                        product_id: product.id.clone(),
                        product_name: product.name.clone(),
                        score: 9 - penalty,
                        reason: AI_RECOMMENDATION_REASON.to_owned(),
                        kind: RecommendationKind::AiGenerated,
                    })
                })
                .collect(),
            Err(AssistantError::NotConfigured) => {
                warn!("No model configured, using fallback recommendations");
                Ok(fallback_recommendations(products))
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, products), fields(products = products.len()))]
    async fn enhance_search(
        &self,
        query: &str,
        products: &[Product],
    ) -> Result<SearchEnhancement, AssistantError> {
        let names = products
            .iter()
            .take(SEARCH_PRODUCT_LIMIT)
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let prompt =
            SEMANTIC_SEARCH.render(&[("query", query), ("availableProducts", names.as_str())]);

        match self.complete(&SEMANTIC_SEARCH, &prompt).await {
            Ok(response) => Ok(parse_search_response(&response, query, products)),
            Err(AssistantError::NotConfigured) => Ok(SearchEnhancement::passthrough(query)),
            Err(e) => Err(e),
        }
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: ChatMessageId,
    pub role: ChatRole,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A conversation with the assistant, opened with [`GREETING`].
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    #[must_use]
    pub fn new() -> Self {
        let mut session = Self {
            messages: Vec::new(),
        };
        session.push(ChatRole::Assistant, GREETING.to_owned());
        session
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn push(&mut self, role: ChatRole, message: String) {
        let id = ChatMessageId::new(format!("msg-{}", self.messages.len() + 1));
        self.messages.push(ChatMessage {
            id,
            role,
            message,
            timestamp: Utc::now(),
        });
    }

    /// Send a message and record the reply. Blank messages are rejected and
    /// leave the transcript untouched.
    ///
    /// # Errors
    ///
    /// Returns the assistant's error.
    pub async fn send<A: ShoppingAssistant>(
        &mut self,
        assistant: &A,
        message: &str,
    ) -> Result<&str, AssistantError> {
        if message.trim().is_empty() {
            return Err(AssistantError::EmptyMessage);
        }
        let reply = assistant.chat(message).await?;
        self.push(ChatRole::User, message.to_owned());
        self.push(ChatRole::Assistant, reply);
        Ok(self
            .messages
            .last()
            .map_or(GREETING, |m| m.message.as_str()))
    }
}
