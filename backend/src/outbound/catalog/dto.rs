//! DTOs for decoding Google Books volume search responses.
//!
//! The adapter decodes into these transport DTOs first, then maps them into
//! [`CatalogVolume`] records in one pass.

use serde::Deserialize;

use crate::domain::ports::CatalogVolume;

#[derive(Debug, Deserialize)]
pub(super) struct VolumesResponseDto {
    #[serde(default)]
    pub(super) items: Vec<VolumeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VolumeDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) volume_info: VolumeInfoDto,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VolumeInfoDto {
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) authors: Vec<String>,
    pub(super) description: Option<String>,
    #[serde(default)]
    pub(super) categories: Vec<String>,
    pub(super) image_links: Option<ImageLinksDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ImageLinksDto {
    pub(super) thumbnail: Option<String>,
}

impl VolumesResponseDto {
    pub(super) fn into_volumes(self) -> Vec<CatalogVolume> {
        self.items.into_iter().map(VolumeDto::into_volume).collect()
    }
}

impl VolumeDto {
    fn into_volume(self) -> CatalogVolume {
        let info = self.volume_info;
        CatalogVolume {
            catalog_id: self.id,
            title: info.title,
            authors: info.authors,
            description: info.description.filter(|text| !text.trim().is_empty()),
            categories: info.categories,
            image_ref: info
                .image_links
                .and_then(|links| links.thumbnail)
                .filter(|thumbnail| !thumbnail.trim().is_empty()),
        }
    }
}
