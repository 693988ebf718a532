// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::path::Path;

use eyre::{ensure, Result, WrapErr};
use serde::{Deserialize, Serialize};

/// Number of slots in a [`DefaultPool`](crate::DefaultPool).
pub const DEFAULT_CAPACITY: usize = 3;

/// Bytes per slot payload when no size is configured.
pub const DEFAULT_PAYLOAD_SIZE: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_payload_size")]
    pub payload_size: usize,
}

fn default_payload_size() -> usize {
    DEFAULT_PAYLOAD_SIZE
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            payload_size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

impl PoolConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read pool config {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: PoolConfig = toml::from_str(content).wrap_err("invalid pool config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.payload_size > 0, "payload_size must be non-zero");
        Ok(())
    }
}
