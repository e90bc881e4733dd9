//! Form drafts and their normalize-and-validate step.
//!
//! The panel's forms round-trip through these draft structs: every field
//! is the raw string the operator typed, and [`ProductDraft::normalize`]
//! / [`CollectionDraft::normalize`] / [`TimerDraft::normalize`] either
//! produce a validated write payload or the first field error. Checks
//! run in a fixed order and short-circuit, so the operator always sees
//! one specific message.

use chrono::{Local, NaiveDateTime, TimeZone};
use serde::Deserialize;

use crate::catalog::{
    CollectionMeta, CollectionPayload, DEFAULT_DROP_TITLE, DEFAULT_WALLPAPER, Product,
    ProductPayload, SiteSettings, TimerPayload,
};
use crate::types::{ProductStatus, Slug};

/// Format of the `datetime-local` input control.
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";
/// Same, with seconds - some browsers submit them.
const DATETIME_LOCAL_FORMAT_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// A field-level validation failure.
///
/// The display strings are exactly what the notice banner shows.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Product name is required.")]
    NameRequired,
    #[error("Collection slug is required.")]
    SlugRequired,
    #[error("Add at least one image URL.")]
    ImagesRequired,
    #[error("Price must be a valid number.")]
    PriceInvalid,
    #[error("Category is required.")]
    CategoryRequired,
    #[error("Pick a valid drop end date/time.")]
    DropEndInvalid,
}

// =============================================================================
// Product draft
// =============================================================================

/// Editable product form state.
///
/// Sizes, colors and images are comma-separated in the form and split
/// during normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub category: String,
    pub collection_slug: String,
    pub description: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub locked: bool,
    pub sizes: String,
    pub colors: String,
    pub images: String,
}

impl ProductDraft {
    /// Validate the draft and build the write payload.
    ///
    /// Checks run in order and the first failure wins: name, slug,
    /// images, price, category.
    ///
    /// # Errors
    ///
    /// Returns the [`FormError`] for the first failing field.
    pub fn normalize(&self, now_ms: i64) -> Result<ProductPayload, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::NameRequired);
        }

        let collection_slug =
            Slug::parse(&self.collection_slug).map_err(|_| FormError::SlugRequired)?;

        let images = split_csv(&self.images);
        if images.is_empty() {
            return Err(FormError::ImagesRequired);
        }

        let price = parse_amount(&self.price)
            .filter(|p| *p > 0.0)
            .ok_or(FormError::PriceInvalid)?;

        let category = self.category.trim();
        if category.is_empty() {
            return Err(FormError::CategoryRequired);
        }

        Ok(ProductPayload {
            name: name.to_owned(),
            price,
            category: category.to_owned(),
            collection_slug,
            description: self.description.trim().to_owned(),
            status: self.status,
            locked: self.locked,
            sizes: split_csv(&self.sizes),
            colors: split_csv(&self.colors),
            images,
            updated_at: now_ms,
        })
    }

    /// Load an existing product into the form, field by field.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: format_amount(product.price),
            category: product.category.clone(),
            collection_slug: product.collection_slug.clone(),
            description: product.description.clone(),
            status: product.status,
            locked: product.locked,
            sizes: product.sizes.join(", "),
            colors: product.colors.join(", "),
            images: product.images.join(", "),
        }
    }
}

// =============================================================================
// Collection draft
// =============================================================================

/// Editable collection form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectionDraft {
    pub slug: String,
    pub name: String,
    pub wallpaper: String,
    #[serde(default)]
    pub locked: bool,
    /// Local date-time string from the `datetime-local` input; empty
    /// means no timer.
    pub unlock_at: String,
}

impl CollectionDraft {
    /// Validate the draft and build the merge-write payload.
    ///
    /// Name defaults to the slug and wallpaper to
    /// [`DEFAULT_WALLPAPER`] when left blank. An unlock time that does
    /// not parse normalizes to 0 (no timer) without error - empty input
    /// means exactly that, and a mangled value degrades the same way.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::SlugRequired`] if the slug is empty after
    /// trimming.
    pub fn normalize(&self, now_ms: i64) -> Result<CollectionPayload, FormError> {
        let slug = Slug::parse(&self.slug).map_err(|_| FormError::SlugRequired)?;

        let name = self.name.trim();
        let name = if name.is_empty() {
            slug.as_str().to_owned()
        } else {
            name.to_owned()
        };

        let wallpaper = self.wallpaper.trim();
        let wallpaper = if wallpaper.is_empty() {
            DEFAULT_WALLPAPER.to_owned()
        } else {
            wallpaper.to_owned()
        };

        Ok(CollectionPayload {
            slug,
            name,
            wallpaper,
            locked: self.locked,
            unlock_at: datetime_local_to_ms(&self.unlock_at),
            updated_at: now_ms,
        })
    }

    /// Load an existing collection into the form.
    ///
    /// The stored millisecond timestamp is reformatted for the
    /// `datetime-local` input; 0 maps back to the empty string.
    #[must_use]
    pub fn from_meta(meta: &CollectionMeta) -> Self {
        Self {
            slug: meta.slug.as_str().to_owned(),
            name: meta.name.clone(),
            wallpaper: meta.wallpaper.clone(),
            locked: meta.locked,
            unlock_at: ms_to_datetime_local(meta.unlock_at),
        }
    }
}

// =============================================================================
// Homepage timer draft
// =============================================================================

/// Editable homepage timer form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TimerDraft {
    pub title: String,
    pub end_at: String,
}

impl TimerDraft {
    /// Validate the draft and build the merge-write payload.
    ///
    /// Unlike the collection unlock timer, the homepage countdown is
    /// meaningless without an end time, so a missing or unparseable
    /// value is an error here.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::DropEndInvalid`] if the end time is empty or
    /// does not parse.
    pub fn normalize(&self, now_ms: i64) -> Result<TimerPayload, FormError> {
        let drop_end_at = datetime_local_to_ms(&self.end_at);
        if drop_end_at == 0 {
            return Err(FormError::DropEndInvalid);
        }

        let title = self.title.trim();
        let drop_title = if title.is_empty() {
            DEFAULT_DROP_TITLE.to_owned()
        } else {
            title.to_owned()
        };

        Ok(TimerPayload {
            drop_title,
            drop_end_at,
            updated_at: now_ms,
        })
    }

    /// Load the stored settings into the form.
    #[must_use]
    pub fn from_settings(settings: &SiteSettings) -> Self {
        Self {
            title: settings.drop_title.clone(),
            end_at: ms_to_datetime_local(settings.drop_end_at),
        }
    }
}

// =============================================================================
// Field helpers
// =============================================================================

/// Split a comma-separated input, trimming entries and dropping empties.
#[must_use]
pub fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse a money amount from free-form input.
///
/// Every character that is not a digit or a period is stripped before
/// parsing, so currency symbols and thousands separators are accepted:
/// `"₦45,000"` parses as 45000. Returns `None` when nothing parseable
/// remains or the value is not finite.
#[must_use]
pub fn parse_amount(input: &str) -> Option<f64> {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let amount = digits.parse::<f64>().ok()?;
    amount.is_finite().then_some(amount)
}

/// Render an amount back into form input, without a trailing `.0`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("{amount}")
}

/// Parse a `datetime-local` input value into millisecond epoch.
///
/// Empty input maps to 0 ("no timer"); so does anything that fails to
/// parse in the operator's local timezone.
#[must_use]
pub fn datetime_local_to_ms(value: &str) -> i64 {
    if value.is_empty() {
        return 0;
    }

    let parsed = NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT_SECONDS));

    parsed.map_or(0, |naive| {
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map_or(0, |local| local.timestamp_millis())
    })
}

/// Format a millisecond epoch for the `datetime-local` input control.
///
/// 0 maps to the empty string.
#[must_use]
pub fn ms_to_datetime_local(ms: i64) -> String {
    if ms == 0 {
        return String::new();
    }

    Local.timestamp_millis_opt(ms).single().map_or_else(
        String::new,
        |local| local.format(DATETIME_LOCAL_FORMAT).to_string(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_product_draft() -> ProductDraft {
        ProductDraft {
            name: " Harmattan Hoodie ".to_owned(),
            price: "₦45,000".to_owned(),
            category: " hoodies ".to_owned(),
            collection_slug: " Season-1 ".to_owned(),
            description: "  heavyweight fleece  ".to_owned(),
            status: ProductStatus::PreOrder,
            locked: true,
            sizes: "S, M , L,XL".to_owned(),
            colors: "Black, Bone".to_owned(),
            images: "https://a.jpg,  https://b.jpg ,".to_owned(),
        }
    }

    // -------------------------------------------------------------------------
    // Product validation order and messages
    // -------------------------------------------------------------------------

    #[test]
    fn rejects_blank_name_first() {
        let draft = ProductDraft {
            name: "   ".to_owned(),
            ..valid_product_draft()
        };
        assert_eq!(draft.normalize(0), Err(FormError::NameRequired));
    }

    #[test]
    fn rejects_blank_slug_second() {
        let draft = ProductDraft {
            collection_slug: String::new(),
            // A later field is also invalid; the slug message must win.
            price: "free".to_owned(),
            ..valid_product_draft()
        };
        assert_eq!(draft.normalize(0), Err(FormError::SlugRequired));
    }

    #[test]
    fn rejects_empty_images() {
        let draft = ProductDraft {
            images: " ,  , ".to_owned(),
            ..valid_product_draft()
        };
        assert_eq!(draft.normalize(0), Err(FormError::ImagesRequired));
    }

    #[test]
    fn rejects_unparseable_price() {
        let draft = ProductDraft {
            price: "free".to_owned(),
            ..valid_product_draft()
        };
        assert_eq!(draft.normalize(0), Err(FormError::PriceInvalid));
    }

    #[test]
    fn rejects_zero_and_negative_price() {
        let draft = ProductDraft {
            price: "0".to_owned(),
            ..valid_product_draft()
        };
        assert_eq!(draft.normalize(0), Err(FormError::PriceInvalid));
    }

    #[test]
    fn rejects_blank_category_last() {
        let draft = ProductDraft {
            category: String::new(),
            ..valid_product_draft()
        };
        assert_eq!(draft.normalize(0), Err(FormError::CategoryRequired));
    }

    #[test]
    fn error_messages_match_the_banner_copy() {
        assert_eq!(FormError::NameRequired.to_string(), "Product name is required.");
        assert_eq!(FormError::SlugRequired.to_string(), "Collection slug is required.");
        assert_eq!(FormError::ImagesRequired.to_string(), "Add at least one image URL.");
        assert_eq!(FormError::PriceInvalid.to_string(), "Price must be a valid number.");
        assert_eq!(FormError::CategoryRequired.to_string(), "Category is required.");
    }

    // -------------------------------------------------------------------------
    // Product normalization
    // -------------------------------------------------------------------------

    #[test]
    fn normalizes_a_full_draft() {
        let payload = valid_product_draft().normalize(1_700_000_000_000).unwrap();

        assert_eq!(payload.name, "Harmattan Hoodie");
        assert_eq!(payload.category, "hoodies");
        assert_eq!(payload.collection_slug.as_str(), "season-1");
        assert_eq!(payload.description, "heavyweight fleece");
        assert!((payload.price - 45000.0).abs() < f64::EPSILON);
        assert_eq!(payload.sizes, ["S", "M", "L", "XL"]);
        assert_eq!(payload.colors, ["Black", "Bone"]);
        assert_eq!(payload.images, ["https://a.jpg", "https://b.jpg"]);
        assert_eq!(payload.status, ProductStatus::PreOrder);
        assert!(payload.locked);
        assert_eq!(payload.updated_at, 1_700_000_000_000);
    }

    #[test]
    fn decimal_prices_survive() {
        let draft = ProductDraft {
            price: "1999.50".to_owned(),
            ..valid_product_draft()
        };
        let payload = draft.normalize(0).unwrap();
        assert!((payload.price - 1999.5).abs() < f64::EPSILON);
    }

    #[test]
    fn product_round_trips_through_the_form() {
        let payload = valid_product_draft().normalize(42).unwrap();
        let product = Product {
            name: payload.name.clone(),
            price: payload.price,
            category: payload.category.clone(),
            collection_slug: payload.collection_slug.as_str().to_owned(),
            description: payload.description.clone(),
            status: payload.status,
            locked: payload.locked,
            sizes: payload.sizes.clone(),
            colors: payload.colors.clone(),
            images: payload.images.clone(),
            ..Product::default()
        };

        let reloaded = ProductDraft::from_product(&product);
        assert_eq!(reloaded.normalize(42).unwrap(), payload);
    }

    // -------------------------------------------------------------------------
    // Collection normalization
    // -------------------------------------------------------------------------

    #[test]
    fn collection_requires_slug_only() {
        let draft = CollectionDraft {
            slug: "  ".to_owned(),
            ..CollectionDraft::default()
        };
        assert_eq!(draft.normalize(0), Err(FormError::SlugRequired));
    }

    #[test]
    fn collection_defaults_name_and_wallpaper() {
        let draft = CollectionDraft {
            slug: " SEASON-2 ".to_owned(),
            ..CollectionDraft::default()
        };
        let payload = draft.normalize(7).unwrap();

        assert_eq!(payload.slug.as_str(), "season-2");
        assert_eq!(payload.name, "season-2");
        assert_eq!(payload.wallpaper, DEFAULT_WALLPAPER);
        assert_eq!(payload.unlock_at, 0);
        assert_eq!(payload.updated_at, 7);
    }

    #[test]
    fn empty_unlock_input_means_no_timer() {
        let draft = CollectionDraft {
            slug: "season-1".to_owned(),
            unlock_at: String::new(),
            ..CollectionDraft::default()
        };
        assert_eq!(draft.normalize(0).unwrap().unlock_at, 0);
    }

    #[test]
    fn mangled_unlock_input_degrades_to_no_timer() {
        let draft = CollectionDraft {
            slug: "season-1".to_owned(),
            unlock_at: "next tuesday".to_owned(),
            ..CollectionDraft::default()
        };
        assert_eq!(draft.normalize(0).unwrap().unlock_at, 0);
    }

    // -------------------------------------------------------------------------
    // Homepage timer normalization
    // -------------------------------------------------------------------------

    #[test]
    fn timer_rejects_missing_end_time() {
        let draft = TimerDraft {
            title: "NEXT DROP".to_owned(),
            end_at: String::new(),
        };
        assert_eq!(draft.normalize(0), Err(FormError::DropEndInvalid));
        assert_eq!(
            FormError::DropEndInvalid.to_string(),
            "Pick a valid drop end date/time."
        );
    }

    #[test]
    fn timer_rejects_unparseable_end_time() {
        let draft = TimerDraft {
            title: String::new(),
            end_at: "soon".to_owned(),
        };
        assert_eq!(draft.normalize(0), Err(FormError::DropEndInvalid));
    }

    #[test]
    fn timer_defaults_blank_title() {
        let draft = TimerDraft {
            title: "  ".to_owned(),
            end_at: "2031-03-01T18:00".to_owned(),
        };
        let payload = draft.normalize(9).unwrap();
        assert_eq!(payload.drop_title, DEFAULT_DROP_TITLE);
        assert_ne!(payload.drop_end_at, 0);
    }

    // -------------------------------------------------------------------------
    // Field helpers
    // -------------------------------------------------------------------------

    #[test]
    fn split_csv_trims_and_drops_empties() {
        assert_eq!(
            split_csv("https://a.jpg,  https://b.jpg ,"),
            ["https://a.jpg", "https://b.jpg"]
        );
        assert!(split_csv("").is_empty());
        assert!(split_csv(" , ,").is_empty());
    }

    #[test]
    fn parse_amount_strips_currency_noise() {
        assert!((parse_amount("₦45,000").unwrap() - 45000.0).abs() < f64::EPSILON);
        assert!((parse_amount("  12.5 ").unwrap() - 12.5).abs() < f64::EPSILON);
        assert_eq!(parse_amount("free"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn datetime_local_round_trips_to_minute_precision() {
        let input = "2031-01-05T09:15";
        let ms = datetime_local_to_ms(input);
        assert_ne!(ms, 0);
        assert_eq!(ms_to_datetime_local(ms), input);
    }

    #[test]
    fn datetime_local_accepts_seconds() {
        let with_seconds = datetime_local_to_ms("2031-01-05T09:15:30");
        let without = datetime_local_to_ms("2031-01-05T09:15");
        assert_eq!(with_seconds - without, 30_000);
    }

    #[test]
    fn zero_formats_as_empty_string() {
        assert_eq!(ms_to_datetime_local(0), "");
        assert_eq!(datetime_local_to_ms(""), 0);
    }

    #[test]
    fn format_amount_drops_trailing_zero() {
        assert_eq!(format_amount(45000.0), "45000");
        assert_eq!(format_amount(1999.5), "1999.5");
    }
}
