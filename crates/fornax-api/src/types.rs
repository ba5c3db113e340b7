use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CnpjListRequest {
    pub cnpjs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplierRequest {
    pub cnpj: String,
}

/// Optional supplier-list filters; both params are substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierListQuery {
    pub company_name: Option<String>,
    pub company_cnpj: Option<String>,
}
