use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::links::{Link, RouteRegistry, routes};
use crate::domain::{Role, User};

/// Something that has an item route and can be linked to.
pub trait Resource {
    /// Route name of the "fetch by id" endpoint.
    const ROUTE: &'static str;
    /// Relation name of the templated link.
    const TEMPLATE_REL: &'static str;

    /// `None` while the entity has no identity yet.
    fn resource_id(&self) -> Option<i64>;
}

impl Resource for Role {
    const ROUTE: &'static str = routes::ROLE;
    const TEMPLATE_REL: &'static str = "roleLinkTempl";

    fn resource_id(&self) -> Option<i64> {
        (self.id > 0).then_some(self.id)
    }
}

/// An entity paired with the links built for one response.
#[derive(Debug, Clone, Serialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub entity: T,
    pub links: Vec<Link>,
}

impl<T> Linked<T> {
    pub fn self_link(&self) -> Option<&Link> {
        self.links.iter().find(|l| l.is_self())
    }
}

/// A sequence of elements with collection-level links.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedCollection<T> {
    pub content: Vec<T>,
    pub links: Vec<Link>,
}

/// Public shape of a user: no password, roles linked individually.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub email: String,
    pub active: bool,
    pub roles: Vec<Linked<Role>>,
    pub created_at: DateTime<Utc>,
}

impl Resource for UserView {
    const ROUTE: &'static str = routes::USER;
    const TEMPLATE_REL: &'static str = "userLinkTempl";

    fn resource_id(&self) -> Option<i64> {
        (self.id > 0).then_some(self.id)
    }
}

/// Builds linked representations from plain entities.
#[derive(Debug, Clone)]
pub struct ResourceAssembler {
    routes: Arc<RouteRegistry>,
}

impl ResourceAssembler {
    pub fn new(routes: RouteRegistry) -> Self {
        Self {
            routes: Arc::new(routes),
        }
    }

    /// Attach a concrete self link and a templated link. An entity without
    /// an id gets no links.
    pub fn link_entity<T: Resource>(&self, entity: T) -> Linked<T> {
        let links = match entity.resource_id() {
            Some(id) => self.item_links::<T>(id),
            None => Vec::new(),
        };
        Linked { entity, links }
    }

    fn item_links<T: Resource>(&self, id: i64) -> Vec<Link> {
        let self_href = self.routes.expand(T::ROUTE, id);
        let template_href = self.routes.template(T::ROUTE);
        match (self_href, template_href) {
            (Some(self_href), Some(template_href)) => vec![
                Link::self_link(self_href),
                Link::templated(T::TEMPLATE_REL, template_href),
            ],
            _ => {
                tracing::warn!(route = T::ROUTE, "route not registered, skipping links");
                Vec::new()
            }
        }
    }

    /// Link a user and each of its roles, keeping role order.
    pub fn link_user(&self, user: User) -> Linked<UserView> {
        let roles = user
            .roles
            .into_iter()
            .map(|role| self.link_entity(role))
            .collect();

        self.link_entity(UserView {
            id: user.id,
            email: user.email,
            active: user.active,
            roles,
            created_at: user.created_at,
        })
    }

    /// Wrap `elements` with a single self link to the listing `route`.
    pub fn wrap_collection<T>(&self, elements: Vec<T>, route: &str) -> LinkedCollection<T> {
        let links = match self.routes.template(route) {
            Some(href) => vec![Link::self_link(href)],
            None => {
                tracing::warn!(route, "route not registered, collection left unlinked");
                Vec::new()
            }
        };
        LinkedCollection {
            content: elements,
            links,
        }
    }

    /// Link every user in input order and wrap them as the user listing.
    pub fn link_users(&self, users: Vec<User>) -> LinkedCollection<Linked<UserView>> {
        let linked: Vec<_> = users.into_iter().map(|u| self.link_user(u)).collect();
        self.wrap_collection(linked, routes::USERS)
    }
}

/// Fold `(category, count)` rows into a map. A repeated category keeps the
/// last row's count.
pub fn build_statistics<I, K>(rows: I) -> BTreeMap<String, i64>
where
    I: IntoIterator<Item = (K, i64)>,
    K: Into<String>,
{
    rows.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
