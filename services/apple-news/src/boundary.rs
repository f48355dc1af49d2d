// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::fmt::Debug;

use rand::Rng;

/// GenerateBoundary produces the multipart boundary for a single request.
///
/// Every call must return a fresh token, and the token must only contain
/// characters that are valid in a header parameter.
pub trait GenerateBoundary: Debug + Send + Sync + 'static {
    /// Generate a new boundary.
    fn generate_boundary(&self) -> String;
}

/// RandomBoundary generates 32 hex chars from 16 random bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBoundary;

impl GenerateBoundary for RandomBoundary {
    fn generate_boundary(&self) -> String {
        let bs: [u8; 16] = rand::thread_rng().gen();
        hex::encode(bs)
    }
}

/// StaticBoundary always returns the same boundary.
///
/// Only useful for tests and reproducible fixtures.
#[derive(Debug, Clone)]
pub struct StaticBoundary(String);

impl StaticBoundary {
    /// Create a new StaticBoundary.
    pub fn new(boundary: impl Into<String>) -> Self {
        Self(boundary.into())
    }
}

impl GenerateBoundary for StaticBoundary {
    fn generate_boundary(&self) -> String {
        self.0.clone()
    }
}
