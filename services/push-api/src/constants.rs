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

// Env values used in push api.
pub const PUSH_API_KEY_ID: &str = "PUSH_API_KEY_ID";
pub const PUSH_API_SECRET: &str = "PUSH_API_SECRET";
pub const PUSH_API_DEBUG: &str = "PUSH_API_DEBUG";

/// Authorization scheme name.
pub const HHMAC: &str = "HHMAC";

/// Field name and filename of the document part sent by `post`.
pub const DOCUMENT_FIELD_NAME: &str = "my_article";
pub const DOCUMENT_FILE_NAME: &str = "article.json";

pub const APPLICATION_JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Length of generated multipart boundaries.
pub const BOUNDARY_LENGTH: usize = 32;
