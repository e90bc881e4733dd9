//! The admin panel page.
//!
//! One server-rendered page carrying the three forms (product,
//! collection, homepage timer) and the two live lists. Query parameters
//! load existing records into the forms: `?edit=<id>` for a product
//! (entering edit mode), `?load=<slug>` for a collection. Action routes
//! re-render this page directly when validation fails so the operator's
//! input is preserved.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tower_sessions::Session;

use harmattan_core::{
    CollectionDraft, CollectionMeta, Product, ProductDraft, ProductId, Slug, TimerDraft,
    form::ms_to_datetime_local,
};

use crate::middleware::RequireOperator;
use crate::services::{Notice, NoticeKind, current_notice, set_notice};
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Build the panel router.
pub fn router() -> Router<AppState> {
    Router::new().route("/admin", get(index))
}

// =============================================================================
// Views
// =============================================================================

/// Notice banner view for templates.
#[derive(Debug, Clone)]
pub struct NoticeView {
    pub kind: String,
    pub message: String,
}

impl From<Notice> for NoticeView {
    fn from(notice: Notice) -> Self {
        Self {
            kind: notice.kind.as_str().to_owned(),
            message: notice.message,
        }
    }
}

/// Product form view: raw field strings plus the edit marker.
#[derive(Debug, Clone, Default)]
pub struct ProductFormView {
    /// Key of the document being edited; empty when creating.
    pub editing_id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub collection_slug: String,
    pub description: String,
    pub status: String,
    pub locked: bool,
    pub sizes: String,
    pub colors: String,
    pub images: String,
}

impl ProductFormView {
    /// Build the view from a draft, marking edit mode when a key is
    /// present.
    #[must_use]
    pub fn from_draft(draft: &ProductDraft, editing: Option<&ProductId>) -> Self {
        Self {
            editing_id: editing.map(ProductId::as_str).unwrap_or_default().to_owned(),
            name: draft.name.clone(),
            price: draft.price.clone(),
            category: draft.category.clone(),
            collection_slug: draft.collection_slug.clone(),
            description: draft.description.clone(),
            status: draft.status.as_str().to_owned(),
            locked: draft.locked,
            sizes: draft.sizes.clone(),
            colors: draft.colors.clone(),
            images: draft.images.clone(),
        }
    }

    /// Whether the form is in edit mode.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        !self.editing_id.is_empty()
    }
}

/// Collection form view.
#[derive(Debug, Clone, Default)]
pub struct CollectionFormView {
    pub slug: String,
    pub name: String,
    pub wallpaper: String,
    pub locked: bool,
    pub unlock_at: String,
}

impl From<&CollectionDraft> for CollectionFormView {
    fn from(draft: &CollectionDraft) -> Self {
        Self {
            slug: draft.slug.clone(),
            name: draft.name.clone(),
            wallpaper: draft.wallpaper.clone(),
            locked: draft.locked,
            unlock_at: draft.unlock_at.clone(),
        }
    }
}

/// Homepage timer form view.
#[derive(Debug, Clone, Default)]
pub struct TimerFormView {
    pub title: String,
    pub end_at: String,
}

impl From<&TimerDraft> for TimerFormView {
    fn from(draft: &TimerDraft) -> Self {
        Self {
            title: draft.title.clone(),
            end_at: draft.end_at.clone(),
        }
    }
}

/// Product table row.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub collection_slug: String,
    pub status: String,
    pub locked: bool,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_str().to_owned(),
            name: product.name.clone(),
            price: format_naira(product.price),
            category: product.category.clone(),
            collection_slug: product.collection_slug.clone(),
            status: product.status.label().to_owned(),
            locked: product.locked,
        }
    }
}

/// Collection table row.
#[derive(Debug, Clone)]
pub struct CollectionRowView {
    pub slug: String,
    pub name: String,
    pub wallpaper: String,
    pub locked: bool,
    pub unlock_label: String,
}

impl From<&CollectionMeta> for CollectionRowView {
    fn from(meta: &CollectionMeta) -> Self {
        let unlock_label = if meta.has_timer() {
            ms_to_datetime_local(meta.unlock_at).replace('T', " ")
        } else {
            "No timer".to_owned()
        };

        Self {
            slug: meta.slug.as_str().to_owned(),
            name: meta.name.clone(),
            wallpaper: meta.wallpaper.clone(),
            locked: meta.locked,
            unlock_label,
        }
    }
}

/// The panel template.
#[derive(Template)]
#[template(path = "admin/index.html")]
struct PanelTemplate {
    operator_email: String,
    notice: Option<NoticeView>,
    product_form: ProductFormView,
    collection_form: CollectionFormView,
    timer_form: TimerFormView,
    products: Vec<ProductRowView>,
    collections: Vec<CollectionRowView>,
}

// =============================================================================
// Rendering
// =============================================================================

/// Render the panel with the given form state.
///
/// Lists are fetched fresh; a list that cannot be loaded renders empty
/// and raises an error notice, same as a failed live update would. With
/// `timer_form` unset, the timer form reflects the stored settings.
pub(crate) async fn render_panel(
    state: &AppState,
    session: &Session,
    operator_email: String,
    product_form: ProductFormView,
    collection_form: CollectionFormView,
    timer_form: Option<TimerFormView>,
) -> Html<String> {
    let catalog = CatalogService::new(state.store());

    let products = match catalog.list_products().await {
        Ok(products) => products.iter().map(ProductRowView::from).collect(),
        Err(e) => {
            set_notice(
                session,
                NoticeKind::Error,
                format!("Could not load products: {e}"),
            )
            .await;
            Vec::new()
        }
    };

    let collections = match catalog.list_collections().await {
        Ok(collections) => collections.iter().map(CollectionRowView::from).collect(),
        Err(e) => {
            set_notice(
                session,
                NoticeKind::Error,
                format!("Could not load collections: {e}"),
            )
            .await;
            Vec::new()
        }
    };

    let timer_form = match timer_form {
        Some(form) => form,
        None => match catalog.site_settings().await {
            Ok(settings) => TimerFormView::from(&TimerDraft::from_settings(&settings)),
            Err(e) => {
                set_notice(
                    session,
                    NoticeKind::Error,
                    format!("Could not load timer: {e}"),
                )
                .await;
                TimerFormView::default()
            }
        },
    };

    let template = PanelTemplate {
        operator_email,
        notice: current_notice(session).await.map(NoticeView::from),
        product_form,
        collection_form,
        timer_form,
        products,
        collections,
    };

    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {e}");
        "Internal Server Error".to_owned()
    }))
}

// =============================================================================
// Handler
// =============================================================================

/// Query parameters loading records into the forms.
#[derive(Debug, Deserialize)]
struct PanelQuery {
    /// Product key to load into the form (enters edit mode).
    edit: Option<String>,
    /// Collection slug to load into the form.
    load: Option<String>,
}

/// The panel page.
///
/// GET /admin
async fn index(
    RequireOperator(identity): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PanelQuery>,
) -> Html<String> {
    let catalog = CatalogService::new(state.store());

    let product_form = match query.edit {
        Some(id) => {
            let id = ProductId::new(id);
            match catalog.find_product(&id).await {
                Ok(Some(product)) => {
                    set_notice(&session, NoticeKind::Info, "Editing product…").await;
                    ProductFormView::from_draft(&ProductDraft::from_product(&product), Some(&id))
                }
                Ok(None) => {
                    set_notice(&session, NoticeKind::Error, "Could not load product.").await;
                    ProductFormView::default()
                }
                Err(e) => {
                    set_notice(
                        &session,
                        NoticeKind::Error,
                        format!("Could not load product: {e}"),
                    )
                    .await;
                    ProductFormView::default()
                }
            }
        }
        None => ProductFormView::default(),
    };

    let collection_form = match query.load.as_deref().map(Slug::parse) {
        Some(Ok(slug)) => match catalog.find_collection(&slug).await {
            Ok(Some(meta)) => {
                set_notice(&session, NoticeKind::Info, format!("Loaded {slug}")).await;
                CollectionFormView::from(&CollectionDraft::from_meta(&meta))
            }
            Ok(None) => {
                set_notice(&session, NoticeKind::Error, "Could not load collection.").await;
                CollectionFormView::default()
            }
            Err(e) => {
                set_notice(
                    &session,
                    NoticeKind::Error,
                    format!("Could not load collection: {e}"),
                )
                .await;
                CollectionFormView::default()
            }
        },
        _ => CollectionFormView::default(),
    };

    render_panel(
        &state,
        &session,
        identity.email.to_string(),
        product_form,
        collection_form,
        None,
    )
    .await
}

// =============================================================================
// Formatting
// =============================================================================

/// Format a price in naira with thousands separators, e.g. `₦45,000`.
fn format_naira(amount: f64) -> String {
    let negative = amount < 0.0;
    let amount = amount.abs();
    let whole = amount.trunc() as i64;
    let fraction = amount.fract();

    let mut grouped = String::new();
    let digits = whole.to_string();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    if fraction > f64::EPSILON {
        format!("{sign}₦{grouped}.{:02}", (fraction * 100.0).round() as i64)
    } else {
        format!("{sign}₦{grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naira_groups_thousands() {
        assert_eq!(format_naira(45000.0), "₦45,000");
        assert_eq!(format_naira(1_250_000.0), "₦1,250,000");
        assert_eq!(format_naira(999.0), "₦999");
    }

    #[test]
    fn naira_keeps_fractions() {
        assert_eq!(format_naira(1999.5), "₦1,999.50");
    }

    #[test]
    fn form_view_marks_edit_mode() {
        let draft = ProductDraft::default();
        let creating = ProductFormView::from_draft(&draft, None);
        assert!(!creating.is_editing());

        let id = ProductId::new("abc123");
        let editing = ProductFormView::from_draft(&draft, Some(&id));
        assert!(editing.is_editing());
        assert_eq!(editing.editing_id, "abc123");
    }

    #[test]
    fn collection_row_labels_timer_state() {
        let meta = CollectionMeta {
            slug: Slug::parse("season-1").expect("valid"),
            name: "Season 1".to_owned(),
            wallpaper: String::new(),
            locked: false,
            unlock_at: 0,
            updated_at: 0,
        };
        assert_eq!(CollectionRowView::from(&meta).unlock_label, "No timer");
    }
}
