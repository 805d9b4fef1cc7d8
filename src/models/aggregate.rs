use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Name of the root node of every aggregate tree.
pub const ROOT_NAME: &str = "rijksbegroting";

/// How deep `build_tree` descends below the agencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeDepth {
    /// Agencies with name and size only.
    AgencyOnly,
    /// Agencies, their bureaus, and the bureaus' line items.
    AgencyAndBureau,
}

/// One node of the agency/bureau/account summation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateNode {
    pub name: String,
    pub size: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AggregateNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// Set on line-item leaves only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
}

impl AggregateNode {
    pub fn leaf(name: impl Into<String>, size: Decimal) -> Self {
        Self {
            name: name.into(),
            size,
            children: None,
            parent_name: None,
            unique_key: None,
        }
    }

    /// Builds a branch whose size is the sum of `children`.
    pub fn branch(name: impl Into<String>, children: Vec<AggregateNode>) -> Self {
        let size = children.iter().map(|c| c.size).sum();
        Self {
            name: name.into(),
            size,
            children: Some(children),
            parent_name: None,
            unique_key: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_name = Some(parent.into());
        self
    }

    pub fn children(&self) -> &[AggregateNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn child(&self, name: &str) -> Option<&AggregateNode> {
        self.children().iter().find(|c| c.name == name)
    }

    /// Copy of this node whose children keep only name and size.
    pub fn shallow(&self) -> Self {
        Self {
            name: self.name.clone(),
            size: self.size,
            children: self.children.as_ref().map(|children| {
                children
                    .iter()
                    .map(|c| AggregateNode::leaf(c.name.clone(), c.size))
                    .collect()
            }),
            parent_name: self.parent_name.clone(),
            unique_key: None,
        }
    }

    /// Checks that every branch's size equals the sum of its children.
    pub fn sizes_consistent(&self) -> bool {
        match &self.children {
            None => true,
            Some(children) => {
                let sum: Decimal = children.iter().map(|c| c.size).sum();
                sum == self.size && children.iter().all(|c| c.sizes_consistent())
            }
        }
    }
}
