use crate::domain::admin::ports::AdminService;
use crate::domain::contact::ports::ContactService;
use crate::domain::subscription::ports::SubscriptionService;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SubscriptionState<SS: SubscriptionService> {
    subscription_service: SS,
}

#[derive(Debug)]
pub struct SharedSubscriptionState<SS: SubscriptionService>(Arc<SubscriptionState<SS>>);

// Clones share the service; `SS` itself need not be `Clone`.
impl<SS: SubscriptionService> Clone for SharedSubscriptionState<SS> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<SS: SubscriptionService> SharedSubscriptionState<SS> {
    pub fn new(subscription_service: SS) -> Self {
        Self(Arc::new(SubscriptionState {
            subscription_service,
        }))
    }

    pub fn subscription_service(&self) -> &SS {
        &self.0.subscription_service
    }
}

#[derive(Debug, Clone)]
pub struct AdminState<AS: AdminService> {
    admin_service: AS,
}

#[derive(Debug)]
pub struct SharedAdminState<AS: AdminService>(Arc<AdminState<AS>>);

impl<AS: AdminService> Clone for SharedAdminState<AS> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<AS: AdminService> SharedAdminState<AS> {
    pub fn new(admin_service: AS) -> Self {
        Self(Arc::new(AdminState { admin_service }))
    }

    pub fn admin_service(&self) -> &AS {
        &self.0.admin_service
    }
}

#[derive(Debug, Clone)]
pub struct ContactState<CS: ContactService> {
    contact_service: CS,
}

#[derive(Debug)]
pub struct SharedContactState<CS: ContactService>(Arc<ContactState<CS>>);

impl<CS: ContactService> Clone for SharedContactState<CS> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<CS: ContactService> SharedContactState<CS> {
    pub fn new(contact_service: CS) -> Self {
        Self(Arc::new(ContactState { contact_service }))
    }

    pub fn contact_service(&self) -> &CS {
        &self.0.contact_service
    }
}
