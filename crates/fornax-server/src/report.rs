use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fornax_batch::ReportGenerator;
use fornax_common::{
    error::Result,
    time,
    types::{Company, CompanyActivity, CompanyPartner},
};
use tokio::fs;

/// Plain file-based stand-in for the spreadsheet writer: serializes the three
/// row-sets into one delimited sheet file under the data dir and returns its
/// name for cataloging.
pub struct FileReportGenerator {
    dir: PathBuf,
}

impl FileReportGenerator {
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref().join("report-files");
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }
}

#[async_trait]
impl ReportGenerator for FileReportGenerator {
    async fn generate(
        &self,
        companies: &[Company],
        activities: &[CompanyActivity],
        partners: &[CompanyPartner],
    ) -> Result<String> {
        let file_name = format!(
            "suppliers-report-{}.csv",
            time::now().format("%Y%m%d%H%M%S")
        );

        let mut sheet = String::new();
        sheet.push_str("cnpj;nome;nome_fantasia;situacao;uf;municipio;capital_social\n");
        for company in companies {
            sheet.push_str(&format!(
                "{};{};{};{};{};{};{}\n",
                company.cnpj,
                company.nome,
                company.nome_fantasia,
                company.situacao,
                company.uf,
                company.municipio,
                company.capital_social
            ));
        }

        sheet.push('\n');
        sheet.push_str("company_cnpj;activity_type;activity_code;activity_description\n");
        for activity in activities {
            sheet.push_str(&format!(
                "{};{};{};{}\n",
                activity.company_cnpj,
                activity.activity_type,
                activity.activity_code,
                activity.activity_description
            ));
        }

        sheet.push('\n');
        sheet.push_str("company_cnpj;nome;qualificacao_socio;pais_origem\n");
        for partner in partners {
            sheet.push_str(&format!(
                "{};{};{};{}\n",
                partner.company_cnpj, partner.nome, partner.qualificacao_socio, partner.pais_origem
            ));
        }

        fs::write(self.dir.join(&file_name), sheet).await?;
        Ok(file_name)
    }
}
