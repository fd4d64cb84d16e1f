use std::sync::Arc;

use tracing::debug;

use shared_database::Store;
use shared_models::pagination::{Page, PageParams};
use shared_models::user::{Role, UserView};

use crate::models::{DoctorError, DoctorSummary};

pub struct DoctorService {
    store: Arc<dyn Store>,
}

impl DoctorService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Every DOCTOR user with their profile, if one has been saved.
    pub async fn list_doctors(
        &self,
        params: &PageParams,
        default_limit: u32,
    ) -> Result<Page<DoctorSummary>, DoctorError> {
        let users = self.store.list_users_by_role(Role::Doctor).await?;
        let page = Page::from_all(users, params, default_limit);

        let mut items = Vec::with_capacity(page.items.len());
        for user in &page.items {
            let profile = self.store.get_doctor_profile(user.id).await?;
            items.push(DoctorSummary {
                user: UserView::from(user),
                profile,
            });
        }

        debug!("Listing {} of {} doctors", items.len(), page.total);

        Ok(Page {
            items,
            page: page.page,
            limit: page.limit,
            total: page.total,
            total_pages: page.total_pages,
        })
    }
}
