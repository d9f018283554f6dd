use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Logical route names registered by [`RouteRegistry::blog`].
pub mod routes {
    pub const USERS: &str = "users";
    pub const USER: &str = "user";
    pub const ROLE: &str = "role";
}

/// Relation name of a concrete link to the resource itself.
pub const SELF_REL: &str = "self";

/// A navigational reference. Templated links keep their placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            templated: false,
        }
    }

    pub fn self_link(href: impl Into<String>) -> Self {
        Self::new(SELF_REL, href)
    }

    pub fn templated(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            templated: true,
        }
    }

    pub fn is_self(&self) -> bool {
        self.rel == SELF_REL
    }
}

#[derive(Debug, Clone)]
struct RouteTemplate {
    path: String,
    param: Option<&'static str>,
}

impl RouteTemplate {
    fn placeholder(&self) -> Option<String> {
        self.param.map(|p| format!("{{{p}}}"))
    }
}

/// Logical route name -> parameterized path, resolved by string substitution.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
    base_url: String,
    templates: HashMap<&'static str, RouteTemplate>,
}

impl RouteRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            templates: HashMap::new(),
        }
    }

    /// Routes served by the blog API under `/api/json`.
    pub fn blog(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
            .with_route(routes::USERS, "/api/json/users", None)
            .with_route(routes::USER, "/api/json/users/{userId}", Some("userId"))
            .with_route(routes::ROLE, "/api/json/roles/{roleId}", Some("roleId"))
    }

    /// Register `path` under `name`. `param` names the `{placeholder}` that
    /// [`expand`](Self::expand) substitutes.
    pub fn with_route(
        mut self,
        name: &'static str,
        path: impl Into<String>,
        param: Option<&'static str>,
    ) -> Self {
        self.templates.insert(
            name,
            RouteTemplate {
                path: path.into(),
                param,
            },
        );
        self
    }

    /// Absolute href with the placeholder replaced by `id`.
    pub fn expand(&self, name: &str, id: i64) -> Option<String> {
        let route = self.templates.get(name)?;
        let path = match route.placeholder() {
            Some(placeholder) => route.path.replace(&placeholder, &id.to_string()),
            None => route.path.clone(),
        };
        Some(format!("{}{}", self.base_url, path))
    }

    /// Absolute href with the placeholder left in place.
    pub fn template(&self, name: &str) -> Option<String> {
        self.templates
            .get(name)
            .map(|route| format!("{}{}", self.base_url, route.path))
    }
}
