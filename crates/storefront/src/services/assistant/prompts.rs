//! Prompt templates for the shopping assistant.

use serde::Serialize;

/// What a prompt template is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptCategory {
    ProductDescription,
    Chatbot,
    Recommendation,
    Search,
}

/// A prompt with `{variable}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: PromptCategory,
    pub template: &'static str,
    pub variables: &'static [&'static str],
}

impl PromptTemplate {
    /// Fill the template. See [`build_prompt`].
    #[must_use]
    pub fn render(&self, variables: &[(&str, &str)]) -> String {
        build_prompt(self.template, variables)
    }
}

pub const PRODUCT_DESCRIPTION: PromptTemplate = PromptTemplate {
    id: "product_description_detailed",
    name: "Descripción Detallada de Producto",
    category: PromptCategory::ProductDescription,
    template: "Eres un experto copywriter de e-commerce. Crea una descripción de producto persuasiva y profesional para:

Producto: {productName}
Categoría: {category}
Características principales: {features}
Precio: {price}
Público objetivo: {targetAudience}

Requisitos:
- Descripción de 100-150 palabras
- Lenguaje persuasivo pero honesto
- Enfócate en beneficios, no solo características
- Incluye llamada a la acción sutil
- Optimizado para SEO con palabras clave naturales
- Tono profesional pero accesible

Formato de respuesta:
[Título atractivo]
[Descripción del producto]
[Beneficios clave en bullet points]
[Llamada a la acción]",
    variables: &["productName", "category", "features", "price", "targetAudience"],
};

pub const CUSTOMER_SERVICE: PromptTemplate = PromptTemplate {
    id: "chatbot_customer_service",
    name: "Chatbot Atención al Cliente",
    category: PromptCategory::Chatbot,
    template: "Eres un asistente virtual de atención al cliente para una tienda e-commerce llamada \"TechStore Pro\".
Eres amable, profesional y siempre buscas ayudar al cliente.

Usuario dice: \"{userMessage}\"
Contexto: {context}
Productos relacionados: {relatedProducts}

Responde de manera:
- Amable y profesional
- Concisa pero completa
- Si no sabes algo, ofrece contactar con un humano
- Sugiere productos cuando sea relevante
- Usa emojis apropiados (máximo 2 por mensaje)",
    variables: &["userMessage", "context", "relatedProducts"],
};

pub const RECOMMENDATIONS: PromptTemplate = PromptTemplate {
    id: "product_recommendations",
    name: "Recomendaciones de Productos",
    category: PromptCategory::Recommendation,
    template: "Eres un sistema de recomendaciones inteligente para e-commerce.

Información del usuario:
- Productos vistos: {viewedProducts}
- Productos en carrito: {cartProducts}
- Categorías preferidas: {preferredCategories}
- Rango de precio: {priceRange}
- Compras anteriores: {purchaseHistory}

Catálogo disponible: {availableProducts}

Genera 5 recomendaciones personalizadas explicando:
1. Por qué recomiendas cada producto
2. Puntuación de relevancia (1-10)
3. Tipo de recomendación (similar, complementario, trending)",
    variables: &[
        "viewedProducts",
        "cartProducts",
        "preferredCategories",
        "priceRange",
        "purchaseHistory",
        "availableProducts",
    ],
};

pub const SEMANTIC_SEARCH: PromptTemplate = PromptTemplate {
    id: "semantic_search",
    name: "Búsqueda Semántica",
    category: PromptCategory::Search,
    template: "Eres un experto en búsqueda semántica para e-commerce.

Consulta del usuario: \"{query}\"

Productos disponibles: {availableProducts}

Tareas:
1. Mejora la consulta con sinónimos y términos relacionados
2. Sugiere 3 búsquedas alternativas
3. Identifica productos que podrían coincidir semánticamente

Responde en JSON:
{\"enhancedQuery\": \"...\", \"suggestions\": [\"...\"], \"matchingProducts\": [\"...\"]}",
    variables: &["query", "availableProducts"],
};

/// Every built-in template.
pub const PROMPT_TEMPLATES: &[PromptTemplate] = &[
    PRODUCT_DESCRIPTION,
    CUSTOMER_SERVICE,
    RECOMMENDATIONS,
    SEMANTIC_SEARCH,
];

/// Look up a template by id.
#[must_use]
pub fn find_template(id: &str) -> Option<&'static PromptTemplate> {
    PROMPT_TEMPLATES.iter().find(|t| t.id == id)
}

/// Replace every `{key}` in `template` with its value.
///
/// Placeholders without a value are left as-is.
#[must_use]
pub fn build_prompt(template: &str, variables: &[(&str, &str)]) -> String {
    variables
        .iter()
        .fold(template.to_owned(), |prompt, (key, value)| {
            prompt.replace(&format!("{{{key}}}"), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_replaces_every_occurrence() {
        let out = build_prompt("{a} and {a} but not {b}", &[("a", "x")]);
        assert_eq!(out, "x and x but not {b}");
    }

    #[test]
    fn test_templates_declare_their_placeholders() {
        for template in PROMPT_TEMPLATES {
            for variable in template.variables {
                assert!(
                    template.template.contains(&format!("{{{variable}}}")),
                    "{} is missing {{{variable}}}",
                    template.id
                );
            }
        }
    }

    #[test]
    fn test_render_fills_all_variables() {
        let vars: Vec<(&str, &str)> = PRODUCT_DESCRIPTION
            .variables
            .iter()
            .map(|v| (*v, "valor"))
            .collect();
        let prompt = PRODUCT_DESCRIPTION.render(&vars);
        for variable in PRODUCT_DESCRIPTION.variables {
            assert!(!prompt.contains(&format!("{{{variable}}}")));
        }
    }

    #[test]
    fn test_find_template() {
        assert_eq!(
            find_template("chatbot_customer_service").map(|t| t.category),
            Some(PromptCategory::Chatbot)
        );
        assert!(find_template("missing").is_none());
    }
}
