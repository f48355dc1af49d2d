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

// Env values used in apple news services.
pub const APPLE_NEWS_API_KEY_ID: &str = "APPLE_NEWS_API_KEY_ID";
pub const APPLE_NEWS_API_KEY_SECRET: &str = "APPLE_NEWS_API_KEY_SECRET";
pub const APPLE_NEWS_ENDPOINT: &str = "APPLE_NEWS_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "https://news-api.apple.com";

/// Authorization scheme name.
pub const HHMAC: &str = "HHMAC";

// Multipart field names and well known parts.
pub const METADATA_FIELD: &str = "metadata";
pub const ARTICLE_NAME: &str = "article";
pub const ARTICLE_FILENAME: &str = "article.json";

// Content types.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";
pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_GIF: &str = "image/gif";
pub const IMAGE_WEBP: &str = "image/webp";
pub const APPLICATION_PDF: &str = "application/pdf";
pub const FONT_SFNT: &str = "application/font-sfnt";
pub const FONT_WOFF: &str = "font/woff";
pub const FONT_OPENTYPE: &str = "application/vnd.ms-opentype";

/// Content types accepted for attachments, anything else is sent as octet-stream.
pub const ALLOWED_MIMETYPES: &[&str] = &[
    IMAGE_JPEG,
    IMAGE_PNG,
    IMAGE_GIF,
    FONT_SFNT,
    "application/x-font-truetype",
    "application/font-truetype",
    FONT_OPENTYPE,
    "application/x-font-opentype",
    "application/font-opentype",
    APPLICATION_OCTET_STREAM,
];
