use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_IMAGE_URL: &str =
    "https://images.pexels.com/photos/264985/pexels-photo-264985.jpeg?auto=compress&cs=tinysrgb&w=400";
pub const DEFAULT_CATEGORY: &str = "geral";

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".gif"];
const IMAGE_HOSTS: &[&str] = &[
    "images.pexels.com",
    "mlstatic.com",
    "images.unsplash.com",
    "cdn.shopify.com",
    "images-na.ssl-images-amazon.com",
    "a-static.mlcdn.com.br",
];

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    Available,
    OutOfStock,
    Discontinued,
    #[serde(other)]
    Unknown,
}

/// A catalog row. Field names follow the `products` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "price_brl")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub affiliate_link: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emotional_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personality_match: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub age_range: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationship_types: Vec<String>,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub occasion_tags: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock_status: StockStatus,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_active() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: ProductId(id.into()),
            name: name.into(),
            description: String::new(),
            price,
            image_url: None,
            affiliate_link: String::new(),
            emotional_tags: Vec::new(),
            personality_match: Vec::new(),
            age_range: Vec::new(),
            relationship_types: Vec::new(),
            budget_range: None,
            occasion_tags: Vec::new(),
            rating: None,
            priority: 0,
            is_active: true,
            stock_status: StockStatus::Available,
            source: None,
            category: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.is_active && self.stock_status == StockStatus::Available
    }

    pub fn display_price(&self) -> String {
        format_price(self.price)
    }

    pub fn source_label(&self) -> &str {
        self.source.as_deref().filter(|source| !source.trim().is_empty()).unwrap_or("Loja")
    }
}

/// What the results page renders for one product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftRecommendation {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image: String,
    pub description: String,
    pub emotional_explanation: String,
    pub affiliate_link: String,
    pub category: String,
}

impl GiftRecommendation {
    pub fn from_product(product: &Product, emotional_explanation: impl Into<String>) -> Self {
        let description = if product.description.trim().is_empty() {
            format!("Produto {} com excelente qualidade e avaliações.", product.source_label())
        } else {
            product.description.clone()
        };

        let category = product
            .category
            .as_deref()
            .or(product.source.as_deref())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_CATEGORY)
            .to_string();

        Self {
            id: product.id.0.clone(),
            name: product.name.clone(),
            price: product.display_price(),
            image: process_image_url(product.image_url.as_deref()),
            description,
            emotional_explanation: emotional_explanation.into(),
            affiliate_link: product.affiliate_link.clone(),
            category,
        }
    }
}

/// `R$ 89,90` style: two decimals, comma separator, no thousands grouping.
pub fn format_price(price: Decimal) -> String {
    format!("R$ {:.2}", price).replace('.', ",")
}

/// Normalizes a product image URL, falling back to the stock placeholder for
/// anything that does not look like an http(s) image.
pub fn process_image_url(raw: Option<&str>) -> String {
    let Some(candidate) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return DEFAULT_IMAGE_URL.to_string();
    };

    let Ok(parsed) = url::Url::parse(candidate) else {
        return DEFAULT_IMAGE_URL.to_string();
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return DEFAULT_IMAGE_URL.to_string();
    }

    let path = parsed.path().to_ascii_lowercase();
    let host = parsed.host_str().unwrap_or_default();
    let looks_like_image = IMAGE_EXTENSIONS.iter().any(|extension| path.contains(extension))
        || IMAGE_HOSTS.iter().any(|known| host.contains(known));
    if !looks_like_image {
        return DEFAULT_IMAGE_URL.to_string();
    }

    // Mercado Livre serves a jpg next to every webp.
    if candidate.contains("mlstatic.com") && candidate.contains(".webp") {
        return candidate.replacen(".webp", ".jpg", 1);
    }

    candidate.to_string()
}
