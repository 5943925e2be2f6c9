//! Shared fixtures for tests.

/// A throwaway self-signed CA certificate. Not a credential for anything.
pub const CA_CERT_PEM: &str = "-----BEGIN CERTIFICATE-----
MIIDCzCCAfOgAwIBAgIUTu1GDhTCTQ/pR5a2Pp+hQoguQjEwDQYJKoZIhvcNAQEL
BQAwFTETMBEGA1UEAwwKa3ViZXJuZXRlczAeFw0yNjA4MDYyMTAzMTdaFw0zNjA4
MDMyMTAzMTdaMBUxEzARBgNVBAMMCmt1YmVybmV0ZXMwggEiMA0GCSqGSIb3DQEB
AQUAA4IBDwAwggEKAoIBAQDreVygYA4WjB6Qsrua6/+C0dYNzfRcpLxLH4la2eim
5TwSaVB/qTjbq8JrqaM+F8wZ3HmSNQg7e3PqSaUezN/6Emo71KwBVuT8ih5Zaopr
V/y2phG0i4bt2o0nJ9708B3Ysr8DC+Bmf2o3Go9NjT4wMhXmtK8QXRV308oPtTVj
ghsP1nhKiIxYqhpv8R+yvKuRSOksHqHC9IsSKHl6fsFE7BofJAgSBAEaM7hBeegA
QfLAa0oYSk9oUaGvOTIrKjVuouHac7BaYKKDMJkjjNsasp9ciPar7o3zOt+/P/3U
NmFLSMlgddYZXHO9/XypEi1K4aaZ7fYtmLjTdEWHeb1PAgMBAAGjUzBRMB0GA1Ud
DgQWBBQ25Sze9DcPo2l+VQ9JCzIiRBY4MDAfBgNVHSMEGDAWgBQ25Sze9DcPo2l+
VQ9JCzIiRBY4MDAPBgNVHRMBAf8EBTADAQH/MA0GCSqGSIb3DQEBCwUAA4IBAQDP
p2IZT76bWXVLALSHdtyW9EkqNpYy2HHWb5nSqjhckHvs5YJZQKYiGlt/24kR2CxZ
WNnk33E7SZ/pjvnvJqN5yK3sirLUJhmDiif+aOh8FUU30D9YruJ0CBYb3+m/aGL2
8apdT/L0wgZoRu7Us0JLQANnWdZnbaXzsNoapdNkbmjsVKXtZIfyZ5SOLYyZJzL5
8qQ7f4wBI+jxwCsnnaXdPq2/GRKBj8ImGfGLUkZKMkFAxb+Y+Zj+tSG3nijLSrpC
eQCkrmi44JgmRrDfo5gFVz4J68vzmOpwqfp4aGoeO5QAij859IkfWKK4gSP2LXyy
/IoDZPMq2eUGDHMBgAeu
-----END CERTIFICATE-----
";

/// Route tracing output to the test harness when `RUST_LOG` asks for it.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
