// Default URLs
pub static DEFAULT_PRODUCTION_DEBIT_URL: &str = "https://debit.blinkpay.co.nz";
pub static DEFAULT_SANDBOX_DEBIT_URL: &str = "https://sandbox.debit.blinkpay.co.nz";

// Paths relative to the debit URL
pub static TOKEN_PATH: &str = "oauth2/token";
pub static PAYMENTS_API_PATH: &str = "payments/v1/";

// Header names
pub static IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";
pub static REQUEST_ID_HEADER: &str = "request-id";
pub static CORRELATION_ID_HEADER: &str = "x-correlation-id";
