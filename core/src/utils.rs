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

//! Utility functions and types.

use std::fmt::{Debug, Formatter};

/// Redact hides a secret such as a bearer token in `Debug` output.
///
/// Secrets shorter than 12 bytes are masked entirely. Longer ones keep three
/// characters on each end so different tokens can still be told apart in logs.
pub struct Redact<'a>(&'a str);

impl<'a, T: AsRef<str> + ?Sized> From<&'a T> for Redact<'a> {
    fn from(value: &'a T) -> Self {
        Redact(value.as_ref())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let secret = self.0;
        if secret.is_empty() {
            return f.write_str("EMPTY");
        }
        if secret.len() < 12 {
            return f.write_str("***");
        }
        match (secret.get(..3), secret.get(secret.len() - 3..)) {
            (Some(head), Some(tail)) => write!(f, "{head}***{tail}"),
            // Not on a char boundary.
            _ => f.write_str("***"),
        }
    }
}
