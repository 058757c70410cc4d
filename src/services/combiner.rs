use std::time::Instant;

use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{ordered_name, Batch, Document, DocumentKind};
use crate::services::converter::ConverterClient;
use crate::services::file_type;

/// Runs a batch through validate, convert, rename and merge.
pub struct Combiner<'a> {
    converter: &'a ConverterClient,
    conversion_concurrency: usize,
}

#[derive(Debug)]
pub struct CombineResult {
    pub pdf: Bytes,
    pub documents: usize,
    pub converted: usize,
    pub processing_time_ms: u64,
}

impl<'a> Combiner<'a> {
    pub fn new(converter: &'a ConverterClient, conversion_concurrency: usize) -> Self {
        Self {
            converter,
            conversion_concurrency: conversion_concurrency.max(1),
        }
    }

    pub async fn combine(&self, batch: Batch) -> AppResult<CombineResult> {
        let start = Instant::now();

        if batch.is_empty() {
            return Err(AppError::MissingFile);
        }

        let documents = batch.into_documents();
        let kinds = validate(&documents)?;
        let converted = kinds.iter().filter(|kind| kind.needs_conversion()).count();

        let mut documents = self.convert_all(documents, &kinds).await?;
        rename_for_merge(&mut documents);

        let pdf = self.converter.merge(&documents).await?;

        Ok(CombineResult {
            pdf,
            documents: documents.len(),
            converted,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    // `buffered` yields in input order whatever order conversions finish in,
    // and dropping the stream on the first error cancels the rest.
    async fn convert_all(
        &self,
        documents: Vec<Document>,
        kinds: &[DocumentKind],
    ) -> AppResult<Vec<Document>> {
        let converter = self.converter;

        stream::iter(documents.into_iter().zip(kinds.iter().copied()))
            .map(|(mut document, kind)| async move {
                if kind.needs_conversion() {
                    let pdf = converter.convert(&document).await?;
                    document.mark_converted(pdf);
                } else {
                    debug!(file_name = %document.name, "Already a PDF, skipping conversion");
                }
                Ok::<_, AppError>(document)
            })
            .buffered(self.conversion_concurrency)
            .try_collect()
            .await
    }
}

/// Sniffs every document before any outbound call is made.
pub fn validate(documents: &[Document]) -> AppResult<Vec<DocumentKind>> {
    documents
        .iter()
        .map(|document| match file_type::detect(&document.data) {
            Some(kind) => {
                debug!(file_name = %document.name, kind = kind.extension(), "Detected file type");
                Ok(kind)
            }
            None => {
                warn!(
                    file_name = %document.name,
                    detected = file_type::describe(&document.data),
                    "Unsupported file type"
                );
                Err(AppError::UnsupportedType {
                    file_name: document.name.clone(),
                })
            }
        })
        .collect()
}

pub fn rename_for_merge(documents: &mut [Document]) {
    let total = documents.len();
    for (index, document) in documents.iter_mut().enumerate() {
        let name = ordered_name(index, total);
        debug!(from = %document.name, to = %name, "Renaming for merge order");
        document.rename(name);
    }
    info!(documents = total, "Documents ordered for merge");
}
