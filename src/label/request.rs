//! # Print Requests
//!
//! The JSON body accepted by `POST /print-label` and its validation into a
//! fully resolved [`LabelRequest`].
//!
//! ```json
//! {
//!   "type": "menu",
//!   "name": "Chicken Wrap",
//!   "labelType": "ppds",
//!   "printer": { "dpi": 203, "labelSizeMm": { "width": 48, "height": 25 } },
//!   "ingredients": ["chicken", "tortilla"],
//!   "allIngredients": [{ "name": "tortilla", "allergens": ["gluten"] }],
//!   "storageInfo": "Keep refrigerated",
//!   "businessName": "Cafe Uno",
//!   "copies": 2
//! }
//! ```

use serde::Deserialize;

use crate::error::{EtiquetaError, Result};
use crate::printer::{LabelGeometry, PrinterConfig};
use crate::protocol::script::Copies;
use crate::render::monochrome::Threshold;

/// Ingredients shown on a label unless the request says otherwise.
pub const DEFAULT_MAX_INGREDIENTS: usize = 5;

// ============================================================================
// WIRE FORMAT
// ============================================================================

/// Print request as received over HTTP. All fields are optional here so
/// that missing ones can be reported with a useful message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintLabelRequest {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub name: Option<String>,
    pub uid: Option<String>,
    pub id: Option<serde_json::Value>,
    pub label_type: Option<String>,
    pub printer: Option<PrinterSettings>,
    pub copies: Option<i64>,
    pub ingredients: Option<Vec<String>>,
    pub all_ingredients: Option<Vec<IngredientEntry>>,
    pub allergens: Option<Vec<AllergenEntry>>,
    pub allergens_list: Option<Vec<String>>,
    pub expiry: Option<String>,
    pub expiry_date: Option<String>,
    pub printed_on: Option<String>,
    pub use_initials: Option<bool>,
    pub selected_initial: Option<String>,
    pub max_ingredients: Option<usize>,
    pub label_height: Option<String>,
    pub storage_info: Option<String>,
    pub business_name: Option<String>,
    pub threshold: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterSettings {
    pub dpi: Option<u32>,
    pub label_size_mm: Option<LabelSizeMm>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LabelSizeMm {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientEntry {
    pub name: String,
    #[serde(default)]
    pub allergens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenEntry {
    pub allergen_name: String,
}

impl PrintLabelRequest {
    /// Identifier echoed back in error responses.
    pub fn label_id(&self) -> Option<String> {
        self.uid.clone().or_else(|| {
            self.id.as_ref().map(|id| match id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        })
    }
}

// ============================================================================
// RESOLVED MODEL
// ============================================================================

/// What is being labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Ingredient,
    Menu,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ingredient => "ingredient",
            Self::Menu => "menu",
        }
    }
}

/// Label flavour requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Cooked,
    Prep,
    Ppds,
    Ppd,
    Default,
    Defrost,
}

impl LabelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cooked => "cooked",
            Self::Prep => "prep",
            Self::Ppds => "ppds",
            Self::Ppd => "ppd",
            Self::Default => "default",
            Self::Defrost => "defrost",
        }
    }

    /// Kind shown on the label banner. Defrost labels look like prep
    /// labels; `ppd` labels carry no banner.
    pub fn render_kind(self) -> Option<Self> {
        match self {
            Self::Defrost => Some(Self::Prep),
            Self::Ppd => None,
            other => Some(other),
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "cooked" => Some(Self::Cooked),
            "prep" => Some(Self::Prep),
            "ppds" => Some(Self::Ppds),
            "ppd" => Some(Self::Ppd),
            "default" => Some(Self::Default),
            "defrost" => Some(Self::Defrost),
            _ => None,
        }
    }
}

/// Layout height of the label design.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelHeight {
    Mm40,
    Mm80,
}

/// Standard label, or a PPDS (prepacked for direct sale) label with its
/// mandatory business and storage information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelVariant {
    Standard,
    Ppds {
        storage_info: String,
        business_name: String,
    },
}

/// A validated print request.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    pub item: ItemKind,
    pub name: String,
    pub label_id: Option<String>,
    pub label_kind: Option<LabelKind>,
    pub variant: LabelVariant,
    pub dpi: u32,
    pub geometry: LabelGeometry,
    pub copies: Copies,
    pub threshold: Threshold,
    pub ingredients: Vec<String>,
    pub all_ingredients: Vec<IngredientEntry>,
    /// Lower-cased allergen names
    pub allergens: Vec<String>,
    pub expiry: Option<String>,
    pub printed_on: Option<String>,
    pub initials: Option<String>,
    pub max_ingredients: usize,
    pub label_height: LabelHeight,
}

impl LabelRequest {
    /// `labelType` reported back to the client.
    pub fn label_type_name(&self) -> &'static str {
        self.label_kind
            .map(LabelKind::as_str)
            .unwrap_or(self.item.as_str())
    }

    pub fn is_ppds(&self) -> bool {
        matches!(self.variant, LabelVariant::Ppds { .. })
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

fn missing(message: &str) -> EtiquetaError {
    EtiquetaError::Validation(message.to_string())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Validate a raw request into a [`LabelRequest`].
pub fn validate(request: &PrintLabelRequest) -> Result<LabelRequest> {
    let (item_type, name) = match (non_empty(&request.item_type), non_empty(&request.name)) {
        (Some(t), Some(n)) => (t, n),
        _ => {
            return Err(missing(
                "Missing required fields: type and name are required",
            ));
        }
    };

    let (dpi, size) = match &request.printer {
        Some(PrinterSettings {
            dpi: Some(dpi),
            label_size_mm: Some(size),
        }) if *dpi > 0 => (*dpi, *size),
        _ => {
            return Err(missing(
                "Missing required printer configuration: printer.dpi and printer.labelSizeMm are required",
            ));
        }
    };

    let item = match item_type {
        "ingredient" => ItemKind::Ingredient,
        "menu" => ItemKind::Menu,
        other => {
            return Err(EtiquetaError::Validation(format!(
                "Unknown item type '{}': expected ingredient or menu",
                other
            )));
        }
    };

    let label_kind = match non_empty(&request.label_type) {
        None => None,
        Some(value) => Some(LabelKind::parse(value).ok_or_else(|| {
            EtiquetaError::Validation(format!("Unknown label type '{}'", value))
        })?),
    };

    let is_ppds = label_kind == Some(LabelKind::Ppds) && item == ItemKind::Menu;
    let variant = if is_ppds {
        match (
            non_empty(&request.storage_info),
            non_empty(&request.business_name),
        ) {
            (Some(storage_info), Some(business_name)) => LabelVariant::Ppds {
                storage_info: storage_info.to_string(),
                business_name: business_name.to_string(),
            },
            _ => return Err(missing("PPDS labels require storageInfo and businessName")),
        }
    } else {
        LabelVariant::Standard
    };

    if item == ItemKind::Menu && request.ingredients.is_none() {
        return Err(missing("Menu items require ingredients array"));
    }
    if item == ItemKind::Menu && request.all_ingredients.is_none() {
        return Err(missing(
            "Menu items require allIngredients array for allergen mapping",
        ));
    }

    let threshold = match request.threshold {
        None => Threshold::DEFAULT,
        Some(value) => Threshold::try_from_i64(value).ok_or_else(|| {
            EtiquetaError::Validation(format!("threshold must be within 0-255, got {}", value))
        })?,
    };

    let geometry = LabelGeometry::new(size.width, size.height, 0.0)?;
    // Reject sizes the printer cannot take before anything is allocated
    PrinterConfig::with_dpi(dpi).label_pixels(&geometry)?;

    let label_height = match request.label_height.as_deref() {
        Some("80mm") => LabelHeight::Mm80,
        Some("40mm") => LabelHeight::Mm40,
        Some(other) => {
            return Err(EtiquetaError::Validation(format!(
                "labelHeight must be 40mm or 80mm, got '{}'",
                other
            )));
        }
        None if is_ppds => LabelHeight::Mm80,
        None => LabelHeight::Mm40,
    };

    let allergens = match (&request.allergens_list, &request.allergens) {
        (Some(list), _) => list.clone(),
        (None, Some(entries)) => entries
            .iter()
            .map(|a| a.allergen_name.to_lowercase())
            .collect(),
        (None, None) => Vec::new(),
    };

    let initials = if request.use_initials.unwrap_or(false) {
        non_empty(&request.selected_initial).map(str::to_string)
    } else {
        None
    };

    Ok(LabelRequest {
        item,
        name: name.to_string(),
        label_id: request.label_id(),
        label_kind,
        variant,
        dpi,
        geometry,
        copies: Copies::normalize(request.copies),
        threshold,
        ingredients: request.ingredients.clone().unwrap_or_default(),
        all_ingredients: request.all_ingredients.clone().unwrap_or_default(),
        allergens,
        expiry: non_empty(&request.expiry)
            .or(non_empty(&request.expiry_date))
            .map(str::to_string),
        printed_on: non_empty(&request.printed_on).map(str::to_string),
        initials,
        max_ingredients: request
            .max_ingredients
            .filter(|&max| max > 0)
            .unwrap_or(DEFAULT_MAX_INGREDIENTS),
        label_height,
    })
}
