//! # Upload Response Negotiation
//!
//! Browsers posting the upload form get a confirmation page; scripts and
//! command-line clients get a bare `201 Created` with a `Location` header.
//! The choice depends only on the `Accept` header.

use chrono::{DateTime, Utc};
use worker::Url;

use crate::constants::MIME_TEXT_HTML;

/// How a successful upload is reported back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadRepresentation {
    /// Rendered confirmation page embedding the share URL.
    Html {
        share_url: Url,
        expires_at: DateTime<Utc>,
    },
    /// `201 Created` carrying only `Location` and `Expires`.
    Created {
        share_url: Url,
        expires_at: DateTime<Utc>,
    },
}

impl UploadRepresentation {
    pub fn share_url(&self) -> &Url {
        match self {
            Self::Html { share_url, .. } | Self::Created { share_url, .. } => share_url,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        match self {
            Self::Html { expires_at, .. } | Self::Created { expires_at, .. } => *expires_at,
        }
    }
}

/// Picks the representation for a successful upload.
pub fn negotiate_upload(
    accept: Option<&str>,
    share_url: Url,
    expires_at: DateTime<Utc>,
) -> UploadRepresentation {
    if accept.map(prefers_html).unwrap_or(false) {
        UploadRepresentation::Html {
            share_url,
            expires_at,
        }
    } else {
        UploadRepresentation::Created {
            share_url,
            expires_at,
        }
    }
}

/// Whether an `Accept` header asks for HTML.
///
/// True when `text/html` is listed explicitly with a non-zero quality and
/// no other listed range carries a higher one. Wildcards alone (`*/*`, as
/// sent by curl) do not count as asking for HTML.
pub fn prefers_html(accept: &str) -> bool {
    let mut html_quality: Option<f32> = None;
    let mut best_other: f32 = 0.0;

    for range in accept.split(',') {
        let mut parts = range.split(';');
        let media = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
        if media.is_empty() {
            continue;
        }
        let quality = parts
            .find_map(|param| {
                let (key, value) = param.split_once('=')?;
                if key.trim().eq_ignore_ascii_case("q") {
                    value.trim().parse::<f32>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(1.0);

        if media == MIME_TEXT_HTML {
            html_quality = Some(html_quality.map_or(quality, |q| q.max(quality)));
        } else {
            best_other = best_other.max(quality);
        }
    }

    matches!(html_quality, Some(q) if q > 0.0 && q >= best_other)
}
