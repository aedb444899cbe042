use homolog_domain::verdict::CatalogRecord;

#[derive(Debug, sqlx::FromRow)]
pub struct VehicleRow {
	pub id_crabi: String,
	pub description: String,
}
impl From<VehicleRow> for CatalogRecord {
	fn from(row: VehicleRow) -> Self {
		Self { catalog_id: row.id_crabi, description: row.description }
	}
}
