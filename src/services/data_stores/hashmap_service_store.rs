use crate::domain::{SalonService, ServiceId, ServiceStore, ServiceStoreError};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapServiceStore {
    services: HashMap<ServiceId, SalonService>,
}

#[async_trait::async_trait]
impl ServiceStore for HashmapServiceStore {
    async fn add_service(
        &mut self,
        service: SalonService,
    ) -> Result<(), ServiceStoreError> {
        if self.services.contains_key(&service.id) {
            return Err(ServiceStoreError::ServiceAlreadyExists);
        }

        self.services.insert(service.id, service);
        Ok(())
    }

    async fn get_service(
        &self,
        id: &ServiceId,
    ) -> Result<SalonService, ServiceStoreError> {
        self.services
            .get(id)
            .cloned()
            .ok_or(ServiceStoreError::ServiceNotFound)
    }
}
