use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use fornax_batch::BatchKind;
use fornax_common::{cnpj, error::FornaxError, time, types::BatchAcknowledgment};
use fornax_store::StoredCompany;
use http::StatusCode;

use crate::{
    ApiState,
    error::ApiError,
    types::{CnpjListRequest, CreateSupplierRequest, SupplierListQuery},
};

/// Resolves the requested CNPJs against the company store and submits a
/// revalidation batch for the ones that exist.
pub async fn revalidate_suppliers(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CnpjListRequest>,
) -> Result<Json<BatchAcknowledgment>, ApiError> {
    let known = state.companies.list_by_cnpjs(&payload.cnpjs).await?;
    if known.is_empty() {
        return Err(FornaxError::CompanyNotFound(
            "no stored supplier matches the given cnpjs".to_string(),
        )
        .into());
    }

    let cnpjs: Vec<String> = known
        .iter()
        .map(|stored| stored.company.cnpj.clone())
        .collect();
    let count = cnpjs.len();
    let record = state.runner.submit(BatchKind::Revalidate, cnpjs).await?;

    Ok(Json(BatchAcknowledgment {
        transaction_control: record,
        message: format!("{count} suppliers are being revalidated, please wait"),
    }))
}

pub async fn list_suppliers(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SupplierListQuery>,
) -> Result<Json<Vec<StoredCompany>>, ApiError> {
    let companies = state.companies.list().await?;
    Ok(Json(filter_suppliers(companies, &query)))
}

/// Name matches are case-insensitive contains; cnpj matches are digit
/// substrings, so formatted input works too.
fn filter_suppliers(
    companies: Vec<StoredCompany>,
    query: &SupplierListQuery,
) -> Vec<StoredCompany> {
    let name = query.company_name.as_deref().map(str::to_lowercase);
    let digits = query
        .company_cnpj
        .as_deref()
        .map(cnpj::normalize)
        .filter(|digits| !digits.is_empty());

    companies
        .into_iter()
        .filter(|stored| {
            name.as_deref()
                .is_none_or(|name| stored.company.nome.to_lowercase().contains(name))
        })
        .filter(|stored| {
            digits
                .as_deref()
                .is_none_or(|digits| stored.company.cnpj.contains(digits))
        })
        .collect()
}

pub async fn get_supplier(
    State(state): State<Arc<ApiState>>,
    Path(cnpj): Path<String>,
) -> Result<Json<StoredCompany>, ApiError> {
    Ok(Json(state.companies.get(&cnpj).await?))
}

pub async fn delete_supplier(
    State(state): State<Arc<ApiState>>,
    Path(cnpj): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.companies.delete(&cnpj).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Registers a supplier from a single direct registry lookup.
pub async fn create_supplier(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Result<Json<StoredCompany>, ApiError> {
    let digits = cnpj::validate(&payload.cnpj)?;
    let record = state.lookup.lookup(&digits).await?;
    let stored = StoredCompany::from_registry(&record, time::now());
    state.companies.save(&stored).await?;
    Ok(Json(stored))
}

#[cfg(test)]
mod tests {
    use fornax_common::{
        time,
        types::{Company, RegistryRecord},
    };
    use fornax_store::StoredCompany;

    use super::{SupplierListQuery, filter_suppliers};

    fn stored(cnpj: &str, nome: &str) -> StoredCompany {
        let record = RegistryRecord {
            cnpj: cnpj.to_string(),
            nome: nome.to_string(),
            ..RegistryRecord::default()
        };
        StoredCompany {
            company: Company::from_registry(&record, time::now()),
            activities: Vec::new(),
            partners: Vec::new(),
        }
    }

    fn sample() -> Vec<StoredCompany> {
        vec![
            stored("11111111000111", "Acme Ferragens"),
            stored("22222222000122", "Beta Logistica"),
        ]
    }

    #[test]
    fn name_filter_is_case_insensitive_contains() {
        let query = SupplierListQuery {
            company_name: Some("FERRAGENS".to_string()),
            company_cnpj: None,
        };
        let found = filter_suppliers(sample(), &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company.nome, "Acme Ferragens");
    }

    #[test]
    fn cnpj_filter_accepts_formatted_input() {
        let query = SupplierListQuery {
            company_name: None,
            company_cnpj: Some("22.222.222/0001-22".to_string()),
        };
        let found = filter_suppliers(sample(), &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].company.cnpj, "22222222000122");
    }

    #[test]
    fn partial_cnpj_matches_as_substring() {
        let query = SupplierListQuery {
            company_name: None,
            company_cnpj: Some("2222".to_string()),
        };
        assert_eq!(filter_suppliers(sample(), &query).len(), 1);
    }

    #[test]
    fn no_filters_returns_everything() {
        let found = filter_suppliers(sample(), &SupplierListQuery::default());
        assert_eq!(found.len(), 2);
    }
}
