use chrono::Utc;
use serde_json::Value;

use crate::{
    dto::website::{FormPreview, ItemAdded, PublishedStore, PublishedStoreList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
    storage::keys,
    stores::website::{
        FormField, FormFieldInput, ImageTarget, ListKind, SectionKind, SelectedSections,
        SocialLink, WebsiteDocument, to_data_url,
    },
};

/// Applies `op` to a copy of the draft, saves it to `previewData`, then commits it.
/// A failed op or save leaves the draft untouched.
async fn edit<R>(
    state: &AppState,
    op: impl FnOnce(&mut WebsiteDocument) -> AppResult<R>,
) -> AppResult<(R, WebsiteDocument)> {
    let mut website = state.website.write().await;
    let mut draft = website.clone();
    let out = op(&mut draft)?;
    state.storage.save_json(keys::PREVIEW_DATA, &draft).await?;
    *website = draft.clone();
    Ok((out, draft))
}

fn published(store_id: String) -> PublishedStore {
    PublishedStore {
        url: format!("/api/stores/{store_id}"),
        store_id,
    }
}

pub async fn get_document(state: &AppState) -> AppResult<ApiResponse<WebsiteDocument>> {
    let document = state.website.read().await.clone();
    Ok(ApiResponse::success("Ok", document, None))
}

pub async fn replace_section(
    state: &AppState,
    section: &str,
    value: Value,
) -> AppResult<ApiResponse<WebsiteDocument>> {
    let kind: SectionKind = section.parse()?;
    let ((), document) = edit(state, |doc| doc.replace_section(kind, value)).await?;
    tracing::debug!(section, "website section saved");
    Ok(ApiResponse::success("Section saved", document, Some(Meta::empty())))
}

pub async fn set_selected_sections(
    state: &AppState,
    selected: SelectedSections,
) -> AppResult<ApiResponse<WebsiteDocument>> {
    let ((), document) = edit(state, |doc| {
        doc.selected_sections = selected;
        Ok(())
    })
    .await?;
    Ok(ApiResponse::success("Sections saved", document, Some(Meta::empty())))
}

pub async fn toggle_section(
    state: &AppState,
    section: &str,
    selected: bool,
) -> AppResult<ApiResponse<WebsiteDocument>> {
    let kind: SectionKind = section.parse()?;
    let ((), document) = edit(state, |doc| {
        doc.selected_sections.set(kind, selected);
        Ok(())
    })
    .await?;
    Ok(ApiResponse::success("Sections saved", document, Some(Meta::empty())))
}

pub async fn add_item(
    state: &AppState,
    list: &str,
    value: Value,
) -> AppResult<ApiResponse<ItemAdded>> {
    let kind: ListKind = list.parse()?;
    let (index, document) = edit(state, |doc| doc.add_item(kind, value)).await?;
    Ok(ApiResponse::success(
        "Item added",
        ItemAdded { index, document },
        Some(Meta::empty()),
    ))
}

pub async fn update_item(
    state: &AppState,
    list: &str,
    index: usize,
    value: Value,
) -> AppResult<ApiResponse<WebsiteDocument>> {
    let kind: ListKind = list.parse()?;
    let ((), document) = edit(state, |doc| doc.update_item(kind, index, value)).await?;
    Ok(ApiResponse::success("Item updated", document, Some(Meta::empty())))
}

pub async fn remove_item(
    state: &AppState,
    list: &str,
    index: usize,
) -> AppResult<ApiResponse<WebsiteDocument>> {
    let kind: ListKind = list.parse()?;
    let ((), document) = edit(state, |doc| doc.remove_item(kind, index)).await?;
    Ok(ApiResponse::success("Item removed", document, Some(Meta::empty())))
}

pub async fn add_member_social(
    state: &AppState,
    member: usize,
    link: SocialLink,
) -> AppResult<ApiResponse<ItemAdded>> {
    let (index, document) = edit(state, |doc| doc.add_member_social(member, link)).await?;
    Ok(ApiResponse::success(
        "Social link added",
        ItemAdded { index, document },
        Some(Meta::empty()),
    ))
}

pub async fn remove_member_social(
    state: &AppState,
    member: usize,
    link: usize,
) -> AppResult<ApiResponse<WebsiteDocument>> {
    let ((), document) = edit(state, |doc| doc.remove_member_social(member, link)).await?;
    Ok(ApiResponse::success("Social link removed", document, Some(Meta::empty())))
}

pub async fn add_field(
    state: &AppState,
    input: FormFieldInput,
) -> AppResult<ApiResponse<FormField>> {
    let (field, _) = edit(state, |doc| doc.add_field(input)).await?;
    Ok(ApiResponse::success("Field added", field, Some(Meta::empty())))
}

pub async fn update_field(
    state: &AppState,
    id: &str,
    input: FormFieldInput,
) -> AppResult<ApiResponse<FormField>> {
    let (field, _) = edit(state, |doc| doc.update_field(id, input)).await?;
    Ok(ApiResponse::success("Field updated", field, Some(Meta::empty())))
}

pub async fn remove_field(state: &AppState, id: &str) -> AppResult<ApiResponse<FormField>> {
    let (field, _) = edit(state, |doc| doc.remove_field(id)).await?;
    Ok(ApiResponse::success("Field removed", field, Some(Meta::empty())))
}

pub async fn contact_preview(state: &AppState) -> AppResult<ApiResponse<FormPreview>> {
    let rows = state.website.read().await.contact_preview();
    Ok(ApiResponse::success("Ok", FormPreview { rows }, None))
}

/// Embeds an uploaded image as a data URL in the targeted slot.
pub async fn upload_image(
    state: &AppState,
    target: &str,
    index: Option<usize>,
    content_type: &str,
    bytes: &[u8],
) -> AppResult<ApiResponse<WebsiteDocument>> {
    let target: ImageTarget = target.parse()?;
    let data_url = to_data_url(content_type, bytes)?;
    let ((), document) = edit(state, |doc| doc.set_image(target, index, data_url)).await?;
    tracing::debug!(content_type, size = bytes.len(), "website image embedded");
    Ok(ApiResponse::success("Image uploaded", document, Some(Meta::empty())))
}

/// Snapshots the draft under `store-<millis>`.
pub async fn publish(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<PublishedStore>> {
    let store_id = {
        // Held until the snapshot is written; store ids are picked one publish at a time.
        let document = state.website.write().await;
        let mut stamp = Utc::now().timestamp_millis();
        while state
            .storage
            .get_item(&keys::store_key(&stamp.to_string()))
            .await?
            .is_some()
        {
            stamp += 1;
        }
        let store_id = stamp.to_string();
        state
            .storage
            .save_json(&keys::store_key(&store_id), &*document)
            .await?;
        store_id
    };

    tracing::info!(store_id = %store_id, by = %user.email, "website published");
    Ok(ApiResponse::success(
        "Website published",
        published(store_id),
        Some(Meta::empty()),
    ))
}

pub async fn list_stores(state: &AppState) -> AppResult<ApiResponse<PublishedStoreList>> {
    let items: Vec<PublishedStore> = state
        .storage
        .keys_with_prefix(keys::STORE_PREFIX)
        .await?
        .into_iter()
        .filter_map(|key| key.strip_prefix(keys::STORE_PREFIX).map(str::to_string))
        .map(published)
        .collect();
    let meta = Meta::whole(&items);
    Ok(ApiResponse::success("Ok", PublishedStoreList { items }, Some(meta)))
}

pub async fn get_store(state: &AppState, store_id: &str) -> AppResult<ApiResponse<WebsiteDocument>> {
    let document = state
        .storage
        .load_json::<WebsiteDocument>(&keys::store_key(store_id))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ok", document, None))
}
