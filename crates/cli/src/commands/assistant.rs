//! Shopping assistant commands.

use techstore_core::{ChatRole, ProductId, RecommendationKind};
use techstore_storefront::Result;
use techstore_storefront::catalog::{
    Catalog, CatalogError, CatalogQuery, CatalogSort, PriceBand, TRENDING_SEARCHES,
    search_suggestions,
};
use techstore_storefront::services::assistant::{
    ChatSession, Recommendation, ShoppingAssistant, UserProfile,
};
use tracing::{debug, info};

const fn kind_label(kind: RecommendationKind) -> &'static str {
    match kind {
        RecommendationKind::Collaborative => "similar",
        RecommendationKind::ContentBased => "perfil",
        RecommendationKind::Trending => "tendencia",
        RecommendationKind::AiGenerated => "IA",
    }
}

/// Run a conversation and return the transcript lines.
async fn converse<A: ShoppingAssistant>(
    assistant: &A,
    messages: &[String],
) -> Result<Vec<String>> {
    let mut session = ChatSession::new();
    for message in messages {
        session.send(assistant, message).await?;
    }
    debug!(messages = session.messages().len(), "Conversation finished");

    Ok(session
        .messages()
        .iter()
        .map(|m| match m.role {
            ChatRole::User => format!("> {}", m.message),
            ChatRole::Assistant => format!("< {}", m.message),
        })
        .collect())
}

/// Print the greeting followed by one reply per message.
///
/// # Errors
///
/// Fails on the first blank message.
#[allow(clippy::print_stdout)]
pub async fn chat<A: ShoppingAssistant>(assistant: &A, messages: &[String]) -> Result<()> {
    for line in converse(assistant, messages).await? {
        println!("{line}");
    }
    Ok(())
}

/// Generate a description and store it on the catalog product.
///
/// # Errors
///
/// Returns `CatalogError::ProductNotFound` for an unknown id.
pub async fn describe<A: ShoppingAssistant>(
    assistant: &A,
    catalog: &mut Catalog,
    product_id: &str,
) -> Result<String> {
    let id = ProductId::new(product_id);
    let product = catalog
        .get(&id)
        .ok_or_else(|| CatalogError::ProductNotFound(id.clone()))?;
    let description = assistant.generate_description(product).await?;
    catalog.apply_description(&id, description.clone())?;
    info!(product_id = %id, "Description generated");
    Ok(description)
}

/// Print a generated description for one product.
///
/// # Errors
///
/// See [`describe`].
#[allow(clippy::print_stdout)]
pub async fn print_description<A: ShoppingAssistant>(
    assistant: &A,
    mut catalog: Catalog,
    product_id: &str,
) -> Result<()> {
    let description = describe(assistant, &mut catalog, product_id).await?;
    if let Some(product) = catalog.get(&ProductId::new(product_id)) {
        println!("{}", product.name);
    }
    println!("{description}");
    Ok(())
}

fn format_recommendation(rec: &Recommendation) -> String {
    format!(
        "{:>2}/10  {} [{}]\n        {}",
        rec.score,
        rec.product_name,
        kind_label(rec.kind),
        rec.reason
    )
}

/// Print recommendations for a profile built from the arguments.
///
/// # Errors
///
/// Returns the assistant's error.
#[allow(clippy::print_stdout)]
pub async fn recommend<A: ShoppingAssistant>(
    assistant: &A,
    catalog: &Catalog,
    categories: Vec<String>,
    viewed: Vec<String>,
) -> Result<()> {
    let profile = UserProfile {
        viewed_products: viewed,
        preferred_categories: categories,
        ..UserProfile::default()
    };
    let recommendations = assistant.recommend(&profile, &catalog.products).await?;
    if recommendations.is_empty() {
        println!("Sin recomendaciones");
    }
    for rec in &recommendations {
        println!("{}", format_recommendation(rec));
    }
    Ok(())
}

/// Catalog rows for a search, after the assistant rewrites the query.
async fn search_rows<A: ShoppingAssistant>(
    assistant: &A,
    catalog: &Catalog,
    query: String,
    category: Option<String>,
    price_band: &str,
    sort: &str,
) -> Result<(Vec<String>, Vec<String>)> {
    let enhancement = assistant.enhance_search(&query, &catalog.products).await?;
    let query = CatalogQuery {
        search: enhancement.enhanced_query,
        category,
        price_band: PriceBand::parse(price_band),
        sort: CatalogSort::parse(sort),
    };
    let rows = catalog
        .query(&query)
        .into_iter()
        .map(|p| {
            format!(
                "{:>4}  {:<40} {:>12}  ★ {:.1}",
                p.id.as_str(),
                p.name,
                catalog.price_of(p).to_string(),
                p.rating
            )
        })
        .collect();
    Ok((rows, enhancement.suggestions))
}

/// Autocomplete entries for `query` followed by the assistant's own
/// suggestions, without repeats.
fn search_hints(query: &str, assistant_suggestions: Vec<String>) -> Vec<String> {
    let mut hints: Vec<String> = search_suggestions(query)
        .into_iter()
        .map(str::to_owned)
        .collect();
    for suggestion in assistant_suggestions {
        if !hints.contains(&suggestion) {
            hints.push(suggestion);
        }
    }
    hints
}

/// Print the products matching a search.
///
/// # Errors
///
/// Returns the assistant's error.
#[allow(clippy::print_stdout)]
pub async fn search<A: ShoppingAssistant>(
    assistant: &A,
    catalog: &Catalog,
    query: String,
    category: Option<String>,
    price_band: &str,
    sort: &str,
) -> Result<()> {
    let typed = query.clone();
    let (rows, suggestions) =
        search_rows(assistant, catalog, query, category, price_band, sort).await?;
    println!("{} productos", rows.len());
    for row in rows {
        println!("{row}");
    }
    let hints = search_hints(&typed, suggestions);
    if !hints.is_empty() {
        println!("Sugerencias: {}", hints.join(", "));
    }
    if typed.trim().is_empty() {
        println!("Tendencias: {}", TRENDING_SEARCHES.join(", "));
    }
    Ok(())
}
