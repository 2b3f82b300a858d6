//! Static product catalog: product id to display attributes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogProduct {
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
}

pub const PRODUCTS: &[CatalogProduct] = &[
    CatalogProduct {
        id: "apple",
        name: "Apple",
        glyph: "🍏",
    },
    CatalogProduct {
        id: "banana",
        name: "Banana",
        glyph: "🍌",
    },
    CatalogProduct {
        id: "lemon",
        name: "Lemon",
        glyph: "🍋",
    },
];

/// Lookup miss means the product is unknown to the shop; callers suppress
/// such entries from rendering rather than erroring.
pub fn product_info(product: &str) -> Option<&'static CatalogProduct> {
    PRODUCTS.iter().find(|candidate| candidate.id == product)
}
