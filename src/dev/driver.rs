// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! IOCSR Driver Lifecycle
//!
//! Loading the driver registers a character device, creates its class and
//! publishes one node (minor 0). Each open of the node gets its own
//! [`Session`] over the shared register bus.

use super::{ChrdevRegistration, ChrdevTable, ClassRegistration, ClassTable, DevT, DeviceNode, OpenFlags};
use crate::config::Config;
use crate::err::{Error, Result};
use crate::reg::RegisterBus;
use crate::session::Session;

/// A loaded IOCSR driver
///
/// Fields drop top to bottom, which releases the node, then the class, then
/// the major: the reverse of [`IocsrDriver::load`].
pub struct IocsrDriver<'t, B: RegisterBus> {
    node: DeviceNode<'t>,
    class: ClassRegistration<'t>,
    chrdev: ChrdevRegistration<'t>,
    bus: B,
    config: Config,
}

impl<'t, B: RegisterBus> IocsrDriver<'t, B> {
    /// Register the device and publish its node
    ///
    /// # Arguments
    ///
    /// * `bus` - Register bus every session will read through
    /// * `config` - Node name, major and logical end
    /// * `chrdevs` - Character device table to register in
    /// * `classes` - Class table to publish the node in
    ///
    /// Anything acquired before a failing step is released before the
    /// error is returned.
    pub fn load(
        bus: B,
        config: Config,
        chrdevs: &'t ChrdevTable,
        classes: &'t ClassTable,
    ) -> Result<Self> {
        config.validate()?;

        let chrdev = chrdevs.register(config.major, &config.name)?;
        let class = classes.create(&config.name)?;
        let node = class.device_create(DevT::new(chrdev.major(), 0), &config.name)?;

        LINFOF!("{} loaded as {}", config.name, node.devt());
        Ok(Self {
            node,
            class,
            chrdev,
            bus,
            config,
        })
    }

    /// Device number of the published node
    pub fn devt(&self) -> DevT {
        self.node.devt()
    }

    /// Major number held by the driver
    pub fn major(&self) -> u32 {
        self.chrdev.major()
    }

    /// Class the node lives in
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register bus shared by all sessions
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Open a session on the node
    ///
    /// The device is read-only: `WRITE` fails with `NotSupported`, and a
    /// request without `READ` fails with `InvalidArgs`.
    pub fn open(&self, flags: OpenFlags) -> Result<Session<'_, B>> {
        if flags.contains(OpenFlags::WRITE) {
            return Err(Error::NotSupported);
        }
        if !flags.contains(OpenFlags::READ) {
            return Err(Error::InvalidArgs);
        }
        Ok(Session::new(&self.bus, self.config.logical_end))
    }

    /// Unload the driver
    pub fn unload(self) {
        // Registrations are released by Drop
    }
}

impl<B: RegisterBus> Drop for IocsrDriver<'_, B> {
    fn drop(&mut self) {
        LINFOF!("{} unloading", self.config.name);
    }
}
