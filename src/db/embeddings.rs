use anyhow::Result;
use rusqlite::{OptionalExtension, params};

use crate::models::embedding::HealthEmbedding;

use super::{Database, fmt_ts, parse_ts};

fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn decode_vector(blob: &[u8], dimensions: usize) -> Result<Vec<f32>> {
    if blob.len() != dimensions * 4 {
        anyhow::bail!(
            "embedding blob has {} bytes, expected {} for {} dimensions",
            blob.len(),
            dimensions * 4,
            dimensions
        );
    }
    Ok(blob
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

struct EmbeddingRow {
    user_id: String,
    summary: String,
    embedding: Vec<u8>,
    dimensions: i64,
    updated_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmbeddingRow> {
    Ok(EmbeddingRow {
        user_id: row.get(0)?,
        summary: row.get(1)?,
        embedding: row.get(2)?,
        dimensions: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn row_to_embedding(r: EmbeddingRow) -> Result<HealthEmbedding> {
    Ok(HealthEmbedding {
        vector: decode_vector(&r.embedding, r.dimensions as usize)?,
        user_id: r.user_id,
        summary: r.summary,
        updated_at: parse_ts(&r.updated_at)?,
    })
}

impl Database {
    /// One row per user; a refresh replaces the previous summary.
    pub fn upsert_embedding(&self, e: &HealthEmbedding) -> Result<()> {
        self.conn.execute(
            "INSERT INTO health_embeddings (user_id, summary, embedding, dimensions, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(user_id) DO UPDATE SET
                summary = excluded.summary,
                embedding = excluded.embedding,
                dimensions = excluded.dimensions,
                updated_at = excluded.updated_at",
            params![
                e.user_id,
                e.summary,
                encode_vector(&e.vector),
                e.vector.len() as i64,
                fmt_ts(&e.updated_at),
            ],
        )?;
        Ok(())
    }

    pub fn get_embedding(&self, user_id: &str) -> Result<Option<HealthEmbedding>> {
        let row = self
            .conn
            .query_row(
                "SELECT user_id, summary, embedding, dimensions, updated_at
                 FROM health_embeddings WHERE user_id = ?1",
                params![user_id],
                read_row,
            )
            .optional()?;
        row.map(row_to_embedding).transpose()
    }

    pub fn all_embeddings(&self) -> Result<Vec<HealthEmbedding>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, summary, embedding, dimensions, updated_at
             FROM health_embeddings ORDER BY updated_at DESC",
        )?;
        let rows = stmt.query_map([], read_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row_to_embedding(row?)?);
        }
        Ok(out)
    }
}
