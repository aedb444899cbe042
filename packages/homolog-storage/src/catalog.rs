use sqlx::PgExecutor;

use homolog_domain::verdict::CatalogRecord;

use crate::{Result, models::VehicleRow};

/// Loads the catalog records for `ids`. Unknown ids are absent from the result; row order is
/// unspecified.
pub async fn fetch_records(
	executor: impl PgExecutor<'_>,
	ids: &[String],
) -> Result<Vec<CatalogRecord>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let rows: Vec<VehicleRow> = sqlx::query_as(
		"\
SELECT id_crabi, description
FROM vehicle
WHERE id_crabi = ANY($1)",
	)
	.bind(ids)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().map(CatalogRecord::from).collect())
}

/// Inserts a catalog record or replaces the description of an existing id.
pub async fn upsert_record(
	executor: impl PgExecutor<'_>,
	record: &CatalogRecord,
) -> Result<CatalogRecord> {
	let row: VehicleRow = sqlx::query_as(
		"\
INSERT INTO vehicle (id_crabi, description)
VALUES ($1, $2)
ON CONFLICT (id_crabi) DO UPDATE
SET description = EXCLUDED.description
RETURNING id_crabi, description",
	)
	.bind(record.catalog_id.as_str())
	.bind(record.description.as_str())
	.fetch_one(executor)
	.await?;

	Ok(row.into())
}
