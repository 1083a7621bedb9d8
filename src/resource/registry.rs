//! Resource Registry - static definitions for the catalog resources
//!
//! Columns, form fields, navigation links and upload capabilities for
//! Category, Product and Color, plus their [`Resource`] implementations.

use super::{Resource, ResourceKind, UploadSpec};
use crate::api::CatalogClient;
use crate::error::{FetchError, ValidationError};
use crate::model::{
    Category, CategoryPayload, Color, ColorPayload, ListFilter, Product, ProductPayload,
    MAX_PRODUCT_PHOTOS,
};

/// Table column definition
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub header: &'static str,
    pub width: u16,
}

/// Form field definition
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub numeric: bool,
}

/// Child resource reachable from a selected row
#[derive(Debug, Clone, Copy)]
pub struct SubResourceDef {
    pub kind: ResourceKind,
    pub display_name: &'static str,
    pub shortcut: char,
    /// Query parameter carrying the parent's id
    pub filter_param: &'static str,
}

pub const PRODUCT_UPLOAD: UploadSpec = UploadSpec {
    path: "productimage",
    field: "photos",
    max_files: MAX_PRODUCT_PHOTOS,
    exact: false,
};

pub const COLOR_UPLOAD: UploadSpec = UploadSpec {
    path: "colorimage",
    field: "photo",
    max_files: 1,
    exact: true,
};

const CATEGORY_PRODUCTS: SubResourceDef = SubResourceDef {
    kind: ResourceKind::Product,
    display_name: "Products",
    shortcut: 'p',
    filter_param: "categoryId",
};

const PRODUCT_COLORS: SubResourceDef = SubResourceDef {
    kind: ResourceKind::Color,
    display_name: "Colors",
    shortcut: 'c',
    filter_param: "productId",
};

fn field(values: &[String], index: usize) -> &str {
    values.get(index).map(|s| s.trim()).unwrap_or("")
}

/// Parse a foreign-key field; empty means "not chosen" (0)
fn parse_id(value: &str, label: &str) -> Result<i64, ValidationError> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<i64>()
        .map_err(|_| ValidationError::new(format!("{} must be a numeric id", label)))
}

// =========================================================================
// Category
// =========================================================================

const CATEGORY_FIELDS: &[FieldDef] = &[FieldDef {
    key: "name",
    label: "Name",
    required: true,
    numeric: false,
}];

const CATEGORY_COLUMNS: &[ColumnDef] = &[
    ColumnDef { header: "ID", width: 8 },
    ColumnDef { header: "NAME", width: 40 },
    ColumnDef { header: "PRODUCTS", width: 10 },
];

impl Resource for Category {
    type Payload = CategoryPayload;

    const KIND: ResourceKind = ResourceKind::Category;
    const PATH: &'static str = "category";
    const UPLOAD: Option<UploadSpec> = None;
    const PARENT: Option<ResourceKind> = None;

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_payload(&self) -> CategoryPayload {
        CategoryPayload {
            name: self.name.clone(),
        }
    }

    fn validate(payload: &CategoryPayload) -> Result<(), ValidationError> {
        payload.validate()
    }

    fn payload_name(payload: &CategoryPayload) -> &str {
        &payload.name
    }

    fn payload_parent_id(_payload: &CategoryPayload) -> Option<i64> {
        None
    }

    fn form_fields() -> &'static [FieldDef] {
        CATEGORY_FIELDS
    }

    fn form_values(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn payload_from_form(values: &[String]) -> Result<CategoryPayload, ValidationError> {
        Ok(CategoryPayload {
            name: field(values, 0).to_string(),
        })
    }

    fn columns() -> &'static [ColumnDef] {
        CATEGORY_COLUMNS
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.products.len().to_string(),
        ]
    }

    fn sub_resource() -> Option<&'static SubResourceDef> {
        Some(&CATEGORY_PRODUCTS)
    }

    /// Unfiltered loads use the joined `/all` view so product counts are available
    async fn load(client: &CatalogClient, filter: &ListFilter) -> Result<Vec<Self>, FetchError> {
        if filter.is_empty() {
            client.fetch_all().await
        } else {
            client.list::<Category>(filter).await
        }
    }
}

// =========================================================================
// Product
// =========================================================================

const PRODUCT_FIELDS: &[FieldDef] = &[
    FieldDef {
        key: "name",
        label: "Name",
        required: true,
        numeric: false,
    },
    FieldDef {
        key: "subName",
        label: "Sub name",
        required: false,
        numeric: false,
    },
    FieldDef {
        key: "description",
        label: "Description",
        required: false,
        numeric: false,
    },
    FieldDef {
        key: "categoryId",
        label: "Category ID",
        required: true,
        numeric: true,
    },
];

const PRODUCT_COLUMNS: &[ColumnDef] = &[
    ColumnDef { header: "ID", width: 8 },
    ColumnDef { header: "CATEGORY", width: 20 },
    ColumnDef { header: "NAME", width: 28 },
    ColumnDef { header: "SUBNAME", width: 24 },
    ColumnDef { header: "COLORS", width: 8 },
    ColumnDef { header: "PHOTOS", width: 8 },
];

impl Resource for Product {
    type Payload = ProductPayload;

    const KIND: ResourceKind = ResourceKind::Product;
    const PATH: &'static str = "product";
    const UPLOAD: Option<UploadSpec> = Some(PRODUCT_UPLOAD);
    const PARENT: Option<ResourceKind> = Some(ResourceKind::Category);

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_payload(&self) -> ProductPayload {
        ProductPayload {
            name: self.name.clone(),
            sub_name: self.sub_name.clone(),
            description: self.description.clone(),
            category_id: self.category_id,
        }
    }

    fn validate(payload: &ProductPayload) -> Result<(), ValidationError> {
        payload.validate()
    }

    fn payload_name(payload: &ProductPayload) -> &str {
        &payload.name
    }

    fn payload_parent_id(payload: &ProductPayload) -> Option<i64> {
        Some(payload.category_id)
    }

    fn form_fields() -> &'static [FieldDef] {
        PRODUCT_FIELDS
    }

    fn form_values(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.sub_name.clone(),
            self.description.clone(),
            self.category_id.to_string(),
        ]
    }

    fn payload_from_form(values: &[String]) -> Result<ProductPayload, ValidationError> {
        Ok(ProductPayload {
            name: field(values, 0).to_string(),
            sub_name: field(values, 1).to_string(),
            description: field(values, 2).to_string(),
            category_id: parse_id(field(values, 3), "Category ID")?,
        })
    }

    fn columns() -> &'static [ColumnDef] {
        PRODUCT_COLUMNS
    }

    fn row(&self) -> Vec<String> {
        let category = self
            .category
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("#{}", self.category_id));
        vec![
            self.id.to_string(),
            category,
            self.name.clone(),
            self.sub_name.clone(),
            self.colors.len().to_string(),
            format!("{}/{}", self.photos.len(), MAX_PRODUCT_PHOTOS),
        ]
    }

    fn sub_resource() -> Option<&'static SubResourceDef> {
        Some(&PRODUCT_COLORS)
    }

    async fn load(client: &CatalogClient, filter: &ListFilter) -> Result<Vec<Self>, FetchError> {
        client.list::<Product>(filter).await
    }
}

// =========================================================================
// Color
// =========================================================================

const COLOR_FIELDS: &[FieldDef] = &[
    FieldDef {
        key: "name",
        label: "Name",
        required: true,
        numeric: false,
    },
    FieldDef {
        key: "hexCode",
        label: "Hex code",
        required: false,
        numeric: false,
    },
    FieldDef {
        key: "productId",
        label: "Product ID",
        required: true,
        numeric: true,
    },
];

const COLOR_COLUMNS: &[ColumnDef] = &[
    ColumnDef { header: "ID", width: 8 },
    ColumnDef { header: "NAME", width: 28 },
    ColumnDef { header: "HEX", width: 10 },
    ColumnDef { header: "PRODUCT", width: 10 },
    ColumnDef { header: "PHOTO", width: 8 },
];

impl Resource for Color {
    type Payload = ColorPayload;

    const KIND: ResourceKind = ResourceKind::Color;
    const PATH: &'static str = "color";
    const UPLOAD: Option<UploadSpec> = Some(COLOR_UPLOAD);
    const PARENT: Option<ResourceKind> = Some(ResourceKind::Product);

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_payload(&self) -> ColorPayload {
        ColorPayload {
            name: self.name.clone(),
            hex_code: self.hex_code.clone(),
            product_id: self.product_id,
        }
    }

    fn validate(payload: &ColorPayload) -> Result<(), ValidationError> {
        payload.validate()
    }

    fn payload_name(payload: &ColorPayload) -> &str {
        &payload.name
    }

    fn payload_parent_id(payload: &ColorPayload) -> Option<i64> {
        Some(payload.product_id)
    }

    fn form_fields() -> &'static [FieldDef] {
        COLOR_FIELDS
    }

    fn form_values(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.hex_code.clone().unwrap_or_default(),
            self.product_id.to_string(),
        ]
    }

    fn payload_from_form(values: &[String]) -> Result<ColorPayload, ValidationError> {
        let hex = field(values, 1);
        Ok(ColorPayload {
            name: field(values, 0).to_string(),
            hex_code: (!hex.is_empty()).then(|| hex.to_string()),
            product_id: parse_id(field(values, 2), "Product ID")?,
        })
    }

    fn columns() -> &'static [ColumnDef] {
        COLOR_COLUMNS
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.hex_code.clone().unwrap_or_else(|| "-".to_string()),
            self.product_id.to_string(),
            if self.photo.is_some() { "yes" } else { "-" }.to_string(),
        ]
    }

    async fn load(client: &CatalogClient, filter: &ListFilter) -> Result<Vec<Self>, FetchError> {
        client.list::<Color>(filter).await
    }
}
