//! Product actions: save, cancel edit, delete, lock toggle.
//!
//! Successful writes redirect back to the bare panel, which resets the
//! form to defaults. Failed saves re-render the panel directly with the
//! submitted values preserved, so a validation message never costs the
//! operator their input.

use axum::{
    Form, Router,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;

use harmattan_core::{ProductDraft, ProductId, ProductStatus};

use crate::middleware::RequireOperator;
use crate::services::catalog::{CatalogService, SavedProduct};
use crate::services::{NoticeKind, set_notice};
use crate::state::AppState;

use super::panel::{CollectionFormView, ProductFormView, render_panel};

/// Build the product actions router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/products", post(save))
        .route("/admin/products/cancel", post(cancel_edit))
        .route("/admin/products/{id}/delete", post(remove))
        .route("/admin/products/{id}/lock", post(toggle_lock))
}

/// Product form body. `editing_id` is the hidden edit marker; empty
/// means create.
#[derive(Debug, Clone, Deserialize)]
struct ProductForm {
    #[serde(default)]
    editing_id: String,
    name: String,
    price: String,
    category: String,
    collection_slug: String,
    description: String,
    status: ProductStatus,
    #[serde(default)]
    locked: bool,
    sizes: String,
    colors: String,
    images: String,
}

impl ProductForm {
    fn editing(&self) -> Option<ProductId> {
        (!self.editing_id.is_empty()).then(|| ProductId::new(self.editing_id.clone()))
    }

    fn into_draft(self) -> ProductDraft {
        ProductDraft {
            name: self.name,
            price: self.price,
            category: self.category,
            collection_slug: self.collection_slug,
            description: self.description,
            status: self.status,
            locked: self.locked,
            sizes: self.sizes,
            colors: self.colors,
            images: self.images,
        }
    }
}

/// Save the product form: create, or update when editing.
///
/// POST /admin/products
async fn save(
    RequireOperator(identity): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Response {
    let editing = form.editing();
    let draft = form.into_draft();
    let now_ms = Utc::now().timestamp_millis();

    let catalog = CatalogService::new(state.store());
    match catalog.save_product(&draft, editing.as_ref(), now_ms).await {
        Ok(SavedProduct::Updated) => {
            set_notice(&session, NoticeKind::Success, "Product updated.").await;
            Redirect::to("/admin").into_response()
        }
        Ok(SavedProduct::Created(_)) => {
            set_notice(&session, NoticeKind::Success, "Product added.").await;
            Redirect::to("/admin").into_response()
        }
        Err(e) => {
            set_notice(&session, NoticeKind::Error, e.to_string()).await;
            render_panel(
                &state,
                &session,
                identity.email.to_string(),
                ProductFormView::from_draft(&draft, editing.as_ref()),
                CollectionFormView::default(),
                None,
            )
            .await
            .into_response()
        }
    }
}

/// Cancel the edit in progress without writing anything.
///
/// POST /admin/products/cancel
async fn cancel_edit(
    RequireOperator(_): RequireOperator,
    session: Session,
) -> Redirect {
    set_notice(&session, NoticeKind::Info, "Edit cancelled.").await;
    Redirect::to("/admin")
}

/// Delete a product. Immediate and irreversible, no confirmation step.
///
/// POST /admin/products/{id}/delete
async fn remove(
    RequireOperator(_): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Redirect {
    let id = ProductId::new(id);
    let catalog = CatalogService::new(state.store());

    match catalog.delete_product(&id).await {
        Ok(()) => set_notice(&session, NoticeKind::Success, "Product deleted.").await,
        Err(e) => set_notice(&session, NoticeKind::Error, e.to_string()).await,
    }

    Redirect::to("/admin")
}

/// Toggle a product's locked flag.
///
/// POST /admin/products/{id}/lock
async fn toggle_lock(
    RequireOperator(_): RequireOperator,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Redirect {
    let id = ProductId::new(id);
    let now_ms = Utc::now().timestamp_millis();
    let catalog = CatalogService::new(state.store());

    match catalog.toggle_product_lock(&id, now_ms).await {
        Ok(true) => set_notice(&session, NoticeKind::Success, "Product locked.").await,
        Ok(false) => set_notice(&session, NoticeKind::Success, "Product unlocked.").await,
        Err(e) => set_notice(&session, NoticeKind::Error, e.to_string()).await,
    }

    Redirect::to("/admin")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_marker_is_optional() {
        let form = ProductForm {
            editing_id: String::new(),
            name: "Cap".to_owned(),
            price: "12000".to_owned(),
            category: "caps".to_owned(),
            collection_slug: "season-1".to_owned(),
            description: String::new(),
            status: ProductStatus::InStock,
            locked: false,
            sizes: String::new(),
            colors: String::new(),
            images: "https://a.jpg".to_owned(),
        };
        assert!(form.editing().is_none());

        let editing = ProductForm {
            editing_id: "abc".to_owned(),
            ..form
        };
        assert_eq!(editing.editing(), Some(ProductId::new("abc")));
    }

    #[test]
    fn form_deserializes_from_urlencoded_body() {
        let body = "editing_id=&name=Cap&price=%E2%82%A612%2C000&category=caps\
                    &collection_slug=Season-1&description=&status=pre-order\
                    &locked=true&sizes=S%2CM&colors=Black&images=https%3A%2F%2Fa.jpg";
        let form: ProductForm = serde_urlencoded::from_str(body).expect("valid form body");

        assert_eq!(form.status, ProductStatus::PreOrder);
        assert!(form.locked);
        assert_eq!(form.price, "₦12,000");
    }
}
