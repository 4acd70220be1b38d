//! Adapter layer: Convert Google Books DTOs to domain models

use super::dto;
use crate::lookup::domain::upgrade_to_https;
use crate::model::ScannedIsbn;

/// First volume of a search, or `None` when the search came back empty
pub fn first_volume(response: dto::VolumesResponse) -> Option<dto::Volume> {
    if response.total_items == 0 {
        return None;
    }
    response.items?.into_iter().next()
}

/// Convert a volume into a [`ScannedIsbn`]
pub fn to_scanned_isbn(isbn: &str, volume: dto::Volume) -> ScannedIsbn {
    let info = volume.volume_info;

    let author = info
        .authors
        .filter(|authors| !authors.is_empty())
        .map(|authors| authors.join(", "));

    let cover_url = info
        .image_links
        .and_then(|links| links.thumbnail.or(links.small_thumbnail))
        .map(|url| upgrade_to_https(&url));

    ScannedIsbn {
        isbn: isbn.to_string(),
        title: info.title,
        author,
        genre: info.categories.and_then(|c| c.into_iter().next()),
        price: None,
        condition: None,
        cover_url,
        publisher: info.publisher,
        published_date: info.published_date,
    }
}
