use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the registry's activity list (`atividade_principal` /
/// `atividades_secundarias`), exactly as the external service returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryActivity {
    pub code: String,
    pub text: String,
}

/// One entry of the registry's partner/ownership list (`qsa`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryPartner {
    pub nome: String,
    pub qual: String,
    #[serde(default)]
    pub pais_origem: String,
    #[serde(default)]
    pub nome_rep_legal: String,
    #[serde(default)]
    pub qual_rep_legal: String,
}

/// The registry lookup response for a single CNPJ. Field names mirror the
/// external service's wire format; they are Brazilian-registry vocabulary and
/// are kept as-is across the whole system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryRecord {
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub situacao: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub porte: String,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub fantasia: String,
    #[serde(default)]
    pub abertura: String,
    #[serde(default)]
    pub natureza_juridica: String,
    #[serde(default)]
    pub logradouro: String,
    #[serde(default)]
    pub numero: String,
    #[serde(default)]
    pub complemento: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub bairro: String,
    #[serde(default)]
    pub municipio: String,
    #[serde(default)]
    pub uf: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub telefone: String,
    #[serde(default)]
    pub efr: String,
    #[serde(default)]
    pub data_situacao: String,
    #[serde(default)]
    pub motivo_situacao: String,
    #[serde(default)]
    pub situacao_especial: String,
    #[serde(default)]
    pub data_situacao_especial: String,
    #[serde(default)]
    pub capital_social: String,
    #[serde(default)]
    pub ultima_atualizacao: String,
    #[serde(default)]
    pub atividade_principal: Vec<RegistryActivity>,
    #[serde(default)]
    pub atividades_secundarias: Vec<RegistryActivity>,
    #[serde(default)]
    pub qsa: Vec<RegistryPartner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Primary,
    Secondary,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "PRIMARY"),
            Self::Secondary => write!(f, "SECONDARY"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub cnpj: String,
    pub status: String,
    pub situacao: String,
    pub tipo: String,
    pub porte: String,
    pub nome: String,
    pub nome_fantasia: String,
    pub abertura: String,
    pub natureza_juridica: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: String,
    pub cep: String,
    pub bairro: String,
    pub municipio: String,
    pub uf: String,
    pub email: String,
    pub telefone: String,
    pub efr: String,
    pub data_situacao: String,
    pub motivo_situacao: String,
    pub situacao_especial: String,
    pub data_situacao_especial: String,
    pub capital_social: String,
    pub ultima_atualizacao: String,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyActivity {
    pub company_cnpj: String,
    pub activity_code: String,
    pub activity_description: String,
    pub activity_type: ActivityType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyPartner {
    pub company_cnpj: String,
    pub nome: String,
    pub qualificacao_socio: String,
    pub pais_origem: String,
    pub nome_rep_legal: String,
    pub qual_rep_legal: String,
}

impl Company {
    pub fn from_registry(record: &RegistryRecord, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            cnpj: crate::cnpj::normalize(&record.cnpj),
            status: record.status.clone(),
            situacao: record.situacao.clone(),
            tipo: record.tipo.clone(),
            porte: record.porte.clone(),
            nome: record.nome.clone(),
            nome_fantasia: record.fantasia.clone(),
            abertura: record.abertura.clone(),
            natureza_juridica: record.natureza_juridica.clone(),
            logradouro: record.logradouro.clone(),
            numero: record.numero.clone(),
            complemento: record.complemento.clone(),
            cep: record.cep.clone(),
            bairro: record.bairro.clone(),
            municipio: record.municipio.clone(),
            uf: record.uf.clone(),
            email: record.email.clone(),
            telefone: record.telefone.clone(),
            efr: record.efr.clone(),
            data_situacao: record.data_situacao.clone(),
            motivo_situacao: record.motivo_situacao.clone(),
            situacao_especial: record.situacao_especial.clone(),
            data_situacao_especial: record.data_situacao_especial.clone(),
            capital_social: record.capital_social.clone(),
            ultima_atualizacao: record.ultima_atualizacao.clone(),
            refreshed_at,
        }
    }
}

impl CompanyActivity {
    /// Flattens the registry's primary and secondary activity lists into one
    /// tagged list keyed by the owning company.
    pub fn from_registry(record: &RegistryRecord) -> Vec<Self> {
        let cnpj = crate::cnpj::normalize(&record.cnpj);
        let primary = record.atividade_principal.iter().map(|activity| Self {
            company_cnpj: cnpj.clone(),
            activity_code: activity.code.clone(),
            activity_description: activity.text.clone(),
            activity_type: ActivityType::Primary,
        });
        let secondary = record.atividades_secundarias.iter().map(|activity| Self {
            company_cnpj: cnpj.clone(),
            activity_code: activity.code.clone(),
            activity_description: activity.text.clone(),
            activity_type: ActivityType::Secondary,
        });
        primary.chain(secondary).collect()
    }
}

impl CompanyPartner {
    pub fn from_registry(record: &RegistryRecord) -> Vec<Self> {
        let cnpj = crate::cnpj::normalize(&record.cnpj);
        record
            .qsa
            .iter()
            .map(|partner| Self {
                company_cnpj: cnpj.clone(),
                nome: partner.nome.clone(),
                qualificacao_socio: partner.qual.clone(),
                pais_origem: partner.pais_origem.clone(),
                nome_rep_legal: partner.nome_rep_legal.clone(),
                qual_rep_legal: partner.qual_rep_legal.clone(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessType {
    RevalidateSupplier,
    GenerateReport,
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RevalidateSupplier => write!(f, "REVALIDATE_SUPPLIER"),
            Self::GenerateReport => write!(f, "GENERATE_REPORT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Updating,
    Done,
    Cancelled,
}

impl TransactionStatus {
    /// DONE and CANCELLED are terminal: nothing writes to the record afterwards.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updating => write!(f, "UPDATING"),
            Self::Done => write!(f, "DONE"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Lifecycle record for one batch job. Created at submission time, checkpointed
/// by the executor after every item, read-only for everyone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionControl {
    pub id: String,
    pub process_type: ProcessType,
    pub status: TransactionStatus,
    /// Advisory estimate handed to the client to drive its progress simulation.
    pub estimated_time_ms: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// Immediate response to a batch submission: the job keeps running after this
/// is sent, and its outcome is only observable through the transaction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAcknowledgment {
    pub transaction_control: TransactionControl,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatusResponse {
    pub transaction_control: TransactionControl,
    pub message: String,
}
