//! Axum route handler for the live resume preview.

use std::collections::BTreeMap;

use axum::{extract::rejection::JsonRejection, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::form::repeater::Section;
use crate::form::resume::{FormOp, Profile, ResumeForm, SectionKind};

pub const MAX_SECTIONS_PER_KIND: usize = 50;
pub const MAX_OPS: usize = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PreviewRequest {
    pub profile: Profile,
    pub sections: BTreeMap<SectionKind, Vec<Section>>,
    pub ops: Vec<FormOp>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub document: String,
    pub profile: Profile,
    pub sections: BTreeMap<SectionKind, Vec<Section>>,
    /// Whether each submitted op changed the form.
    pub applied: Vec<bool>,
    pub regenerations: u64,
}

/// POST /api/v1/resume/preview
///
/// Restores the submitted form state, replays `ops` against it and returns
/// the regenerated document.
pub async fn handle_preview(
    payload: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<PreviewResponse>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::Validation(format!("Invalid form state: {e}")))?;

    if request.ops.len() > MAX_OPS {
        return Err(AppError::Validation(format!(
            "At most {MAX_OPS} operations per request"
        )));
    }
    if let Some((kind, _)) = request
        .sections
        .iter()
        .find(|(_, entries)| entries.len() > MAX_SECTIONS_PER_KIND)
    {
        return Err(AppError::Validation(format!(
            "{} allows at most {MAX_SECTIONS_PER_KIND} entries",
            kind.title()
        )));
    }

    let mut form = ResumeForm::restore(request.profile, &request.sections);
    let mut applied = Vec::with_capacity(request.ops.len());
    for op in &request.ops {
        if matches!(op, FormOp::AddSection { section }
            if form.section(*section).sections().len() >= MAX_SECTIONS_PER_KIND)
        {
            applied.push(false);
            continue;
        }
        applied.push(form.apply(op));
    }

    Ok(Json(PreviewResponse {
        document: form.preview().to_string(),
        profile: form.profile().clone(),
        sections: form.snapshot(),
        applied,
        regenerations: form.regenerations(),
    }))
}
