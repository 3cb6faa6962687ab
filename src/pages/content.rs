//! Slider and topics screens: plain list, create, delete.

use wire::{Attachment, FormPayload, Record, RecordId, Slide, Topic};

use super::refetch;
use crate::net::ClientError;
use crate::state::slice::{ListQuery, ResourceSlice};

/// A screen over an unfiltered, unpaginated collection.
pub struct CatalogPage<R: Record> {
    slice: ResourceSlice<R>,
}

pub type SliderPage = CatalogPage<Slide>;
pub type TopicsPage = CatalogPage<Topic>;

impl<R: Record> CatalogPage<R> {
    #[must_use]
    pub fn new(slice: ResourceSlice<R>) -> Self {
        Self { slice }
    }

    #[must_use]
    pub fn slice(&self) -> &ResourceSlice<R> {
        &self.slice
    }

    /// # Errors
    ///
    /// The list failure, also recorded in the list slot.
    pub async fn mount(&self) -> Result<Vec<R>, ClientError> {
        self.slice.list(ListQuery::default()).await
    }

    /// # Errors
    ///
    /// The create failure, also recorded in the create slot.
    pub async fn create(&self, payload: FormPayload) -> Result<R, ClientError> {
        let created = self.slice.create(payload).await?;
        refetch(&self.slice, ListQuery::default()).await;
        Ok(created)
    }

    /// # Errors
    ///
    /// The delete failure, also recorded in the delete slot.
    pub async fn delete(&self, id: RecordId) -> Result<(), ClientError> {
        self.slice.delete(id).await?;
        refetch(&self.slice, ListQuery::default()).await;
        Ok(())
    }

    pub fn unmount(&self) {
        self.slice.clear_all_errors();
    }
}

/// Slider entry form: a title and the banner image.
#[must_use]
pub fn slide_form(title: &str, image: Attachment) -> FormPayload {
    FormPayload::new().field("title", title).file("image", image)
}

/// Topic form with both localized names.
#[must_use]
pub fn topic_form(name_en: &str, name_ar: &str, slug: &str) -> FormPayload {
    FormPayload::new()
        .field("name_en", name_en)
        .field("name_ar", name_ar)
        .field("slug", slug)
}

#[cfg(test)]
#[path = "content_test.rs"]
mod tests;
