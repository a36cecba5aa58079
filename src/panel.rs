//! # Admin Panel
//!
//! What the browser side of the back office expects from `/api/admin`.
//!
//! ## Overall Payloads
//!
//! JSON both ways, camelCase keys.
//!
//! ### Envelope
//! - success: always present
//! - data: on success, when there is something to return
//! - error: on failure, short human readable reason
//! - message: confirmation text for writes
//!
//! ### Session
//! Cookies
//! - admin_session: `authenticated`, HttpOnly, Secure, SameSite=Strict, lasting `SESSION_TIMEOUT` seconds
//!
//! Login
//! - POST `/auth` with `{ password }`
//! - 400 if empty, 401 if wrong, 200 + cookie otherwise
//!
//! Logout
//! - POST `/logout`, cookie overwritten with `Max-Age=0`
//!
//! Any other route without the cookie
//! - 401 `Unauthorized`, nothing is touched
//!
//! ### Menu
//! - GET `/menu` sorted by displayOrder, stock under `inventory: { currentStock, lowStockThreshold, isSoldOut }`,
//!   all null when the item has no inventory row
//! - POST `/menu` needs title, description and category, 201 with `{ id }`
//! - PUT `/menu/{id}` same fields, omitted displayOrder keeps the current one
//! - POST `/menu/reorder` with `{ order: [{ id, displayOrder }] }` after a drag and drop
//!
//! ### Inventory
//! - PUT `/inventory/{menuItemId}` with any of currentStock, lowStockThreshold, isSoldOut
//! - currentStock `null` or blank means untracked
//! - isSoldOut may be sent as `1`/`0`, numbers may be sent as their input text
//!
//! ### Batches
//! - pickupDate is `YYYY-MM-DD`, cutoffDate is RFC 3339
//! - status is one of open, closed, fulfilled
//! - DELETE is refused once a single order exists
//!
//! ### Uploads
//! - multipart field `image`, JPEG/PNG/WebP, 10MB max
//! - returns `{ filename, url }`, url goes straight into the item's imageUrl
//!
//!
//!
//! ## Flow
//!
//! - Panel loads, tries GET `/menu`
//! - 401 sends the operator to the password screen
//! - Edits save one item at a time, stock edits save per field
//! - Publishing a change to the storefront is an explicit "Clear cache" press
//! - Clear cache bumps the version even when the CDN is down, the panel shows
//!   `cloudflareCleared` so the operator knows to retry
//!
//!
//!
//! ## Batches
//!
//! - Create next week's batch after stock counts are in
//! - The batch freezes stock at creation, later edits only affect new batches
//! - Close the batch at cutoff, mark fulfilled after pickup
//! - Cancelled orders still block deletion, the paper trail stays
