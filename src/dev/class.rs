// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! Device Classes and Nodes

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use spin::Mutex;

use super::DevT;
use crate::err::{Error, Result};

/// Device classes and the nodes created under them
pub struct ClassTable {
    classes: Mutex<BTreeMap<String, BTreeMap<String, DevT>>>,
}

impl ClassTable {
    /// Create an empty table
    pub const fn new() -> Self {
        Self {
            classes: Mutex::new(BTreeMap::new()),
        }
    }

    /// Create a device class
    ///
    /// Fails with `AlreadyExists` if the name is taken.
    pub fn create(&self, name: &str) -> Result<ClassRegistration<'_>> {
        let mut classes = self.classes.lock();
        if classes.contains_key(name) {
            return Err(Error::AlreadyExists);
        }
        classes.insert(name.to_string(), BTreeMap::new());
        LINFOF!("class {} created", name);

        Ok(ClassRegistration {
            table: self,
            name: name.to_string(),
        })
    }

    /// Check whether a class exists
    pub fn contains(&self, class: &str) -> bool {
        self.classes.lock().contains_key(class)
    }

    /// Nodes of a class, sorted by name
    pub fn nodes(&self, class: &str) -> Vec<(String, DevT)> {
        self.classes
            .lock()
            .get(class)
            .map(|nodes| nodes.iter().map(|(name, devt)| (name.clone(), *devt)).collect())
            .unwrap_or_default()
    }

    fn destroy(&self, class: &str) {
        if let Some(nodes) = self.classes.lock().remove(class) {
            LINFOF!("class {} destroyed ({} nodes left)", class, nodes.len());
        }
    }

    fn remove_node(&self, class: &str, name: &str) {
        if let Some(nodes) = self.classes.lock().get_mut(class) {
            if let Some(devt) = nodes.remove(name) {
                LINFOF!("device {} ({}) removed", name, devt);
            }
        }
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

/// A created device class, destroyed on drop
#[must_use = "dropping the registration destroys the class"]
pub struct ClassRegistration<'t> {
    table: &'t ClassTable,
    name: String,
}

impl<'t> ClassRegistration<'t> {
    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a device node in this class
    ///
    /// Fails with `AlreadyExists` if the class already has a node of that
    /// name, or `DeviceUnavailable` if the class was destroyed underneath.
    pub fn device_create(&self, devt: DevT, name: &str) -> Result<DeviceNode<'t>> {
        let mut classes = self.table.classes.lock();
        let nodes = classes.get_mut(&self.name).ok_or(Error::DeviceUnavailable)?;
        if nodes.contains_key(name) {
            return Err(Error::AlreadyExists);
        }
        nodes.insert(name.to_string(), devt);
        LINFOF!("device {} ({}) created in class {}", name, devt, self.name);

        Ok(DeviceNode {
            table: self.table,
            class: self.name.clone(),
            name: name.to_string(),
            devt,
        })
    }
}

impl Drop for ClassRegistration<'_> {
    fn drop(&mut self) {
        self.table.destroy(&self.name);
    }
}

/// A device node, removed on drop
#[must_use = "dropping the node removes it"]
pub struct DeviceNode<'t> {
    table: &'t ClassTable,
    class: String,
    name: String,
    devt: DevT,
}

impl DeviceNode<'_> {
    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Device number
    pub fn devt(&self) -> DevT {
        self.devt
    }
}

impl Drop for DeviceNode<'_> {
    fn drop(&mut self) {
        self.table.remove_node(&self.class, &self.name);
    }
}
