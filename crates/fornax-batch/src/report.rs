use async_trait::async_trait;
use fornax_common::{
    error::Result,
    types::{Company, CompanyActivity, CompanyPartner},
};

/// Boundary to the spreadsheet writer. The batch runner hands over the three
/// row-sets derived from a completed report job and gets back the name of the
/// produced artifact to catalog.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(
        &self,
        companies: &[Company],
        activities: &[CompanyActivity],
        partners: &[CompanyPartner],
    ) -> Result<String>;
}
