//! External signing toolchain: `makecert` followed by `pvk2pfx`.
//!
//! [`SigningToolchain`] is the seam the provisioner drives. [`SdkToolchain`]
//! launches the Windows SDK executables; tests substitute their own
//! implementation.

use async_trait::async_trait;
use common::process::{ProcessError, ToolCommand};
use std::path::PathBuf;
use std::time::Duration;

/// Extended key usage: code signing.
pub const EKU_CODE_SIGNING: &str = "1.3.6.1.5.5.7.3.3";
/// Extended key usage: lifetime signing (timestamping).
pub const EKU_LIFETIME_SIGNING: &str = "1.3.6.1.4.1.311.10.3.13";
/// Expiration stamped into generated test certificates.
pub const TEST_CERT_EXPIRATION: &str = "10/01/2014";

/// Validity policy of generated certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertPolicy {
    pub key_usages: Vec<String>,
    pub expires: String,
}

impl Default for CertPolicy {
    fn default() -> Self {
        Self {
            key_usages: vec![EKU_CODE_SIGNING.into(), EKU_LIFETIME_SIGNING.into()],
            expires: TEST_CERT_EXPIRATION.into(),
        }
    }
}

/// Step 1: a self-signed, password-less key/certificate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeCertRequest {
    pub pvk: PathBuf,
    pub cer: PathBuf,
    /// Certificate subject common name.
    pub subject: Option<String>,
    pub policy: CertPolicy,
}

impl MakeCertRequest {
    /// `makecert` arguments: `/r /h 0 /eku <oids> /e <date> [/n CN=<subject>] /sv <pvk> <cer>`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "/r".to_string(),
            "/h".to_string(),
            "0".to_string(),
            "/eku".to_string(),
            self.policy.key_usages.join(","),
            "/e".to_string(),
            self.policy.expires.clone(),
        ];
        if let Some(subject) = &self.subject {
            args.push("/n".to_string());
            args.push(format!("CN={subject}"));
        }
        args.push("/sv".to_string());
        args.push(self.pvk.to_string_lossy().into_owned());
        args.push(self.cer.to_string_lossy().into_owned());
        args
    }
}

/// Step 2: bundle the key and certificate into a PFX container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PfxRequest {
    pub pvk: PathBuf,
    pub cer: PathBuf,
    pub pfx: PathBuf,
}

impl PfxRequest {
    /// `pvk2pfx` arguments: `/pvk <pvk> /spc <cer> /pfx <pfx>`.
    pub fn args(&self) -> Vec<String> {
        vec![
            "/pvk".to_string(),
            self.pvk.to_string_lossy().into_owned(),
            "/spc".to_string(),
            self.cer.to_string_lossy().into_owned(),
            "/pfx".to_string(),
            self.pfx.to_string_lossy().into_owned(),
        ]
    }
}

/// The two external steps of certificate generation.
#[async_trait]
pub trait SigningToolchain: Send + Sync {
    /// Name used for the first step in diagnostics.
    fn make_cert_tool(&self) -> &str {
        "makecert"
    }

    /// Name used for the second step in diagnostics.
    fn convert_tool(&self) -> &str {
        "pvk2pfx"
    }

    async fn make_cert(&self, request: &MakeCertRequest) -> Result<(), ProcessError>;

    async fn convert_to_pfx(&self, request: &PfxRequest) -> Result<(), ProcessError>;
}

/// Windows SDK executables resolved from `PATH`.
#[derive(Debug, Clone)]
pub struct SdkToolchain {
    makecert: String,
    pvk2pfx: String,
    timeout: Option<Duration>,
}

impl SdkToolchain {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            makecert: "makecert".into(),
            pvk2pfx: "pvk2pfx".into(),
            timeout,
        }
    }

    /// Overrides the executable paths (e.g. a specific SDK `bin` directory).
    pub fn with_programs(mut self, makecert: impl Into<String>, pvk2pfx: impl Into<String>) -> Self {
        self.makecert = makecert.into();
        self.pvk2pfx = pvk2pfx.into();
        self
    }
}

impl Default for SdkToolchain {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl SigningToolchain for SdkToolchain {
    fn make_cert_tool(&self) -> &str {
        &self.makecert
    }

    fn convert_tool(&self) -> &str {
        &self.pvk2pfx
    }

    async fn make_cert(&self, request: &MakeCertRequest) -> Result<(), ProcessError> {
        ToolCommand::new(&self.makecert)
            .args(request.args())
            .timeout(self.timeout)
            .run()
            .await
            .map(|_| ())
    }

    async fn convert_to_pfx(&self, request: &PfxRequest) -> Result<(), ProcessError> {
        ToolCommand::new(&self.pvk2pfx)
            .args(request.args())
            .timeout(self.timeout)
            .run()
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_makecert_args_fixed_policy() {
        let req = MakeCertRequest {
            pvk: PathBuf::from("App_Key.pvk"),
            cer: PathBuf::from("App_Key.cer"),
            subject: None,
            policy: CertPolicy::default(),
        };
        assert_eq!(
            req.args(),
            vec![
                "/r",
                "/h",
                "0",
                "/eku",
                "1.3.6.1.5.5.7.3.3,1.3.6.1.4.1.311.10.3.13",
                "/e",
                "10/01/2014",
                "/sv",
                "App_Key.pvk",
                "App_Key.cer",
            ]
        );
    }

    #[test]
    fn test_makecert_args_with_subject() {
        let req = MakeCertRequest {
            pvk: PathBuf::from("k.pvk"),
            cer: PathBuf::from("k.cer"),
            subject: Some("Contoso".into()),
            policy: CertPolicy::default(),
        };
        let args = req.args();
        let n = args.iter().position(|a| a == "/n").unwrap();
        assert_eq!(args[n + 1], "CN=Contoso");
        assert_eq!(args.last().map(String::as_str), Some("k.cer"));
    }

    #[test]
    fn test_pvk2pfx_args() {
        let req = PfxRequest {
            pvk: PathBuf::from("k.pvk"),
            cer: PathBuf::from("k.cer"),
            pfx: PathBuf::from("k.pfx"),
        };
        assert_eq!(
            req.args(),
            vec!["/pvk", "k.pvk", "/spc", "k.cer", "/pfx", "k.pfx"]
        );
    }

    #[tokio::test]
    async fn test_missing_sdk_tool_reports_not_found() {
        let toolchain =
            SdkToolchain::default().with_programs("winpack-no-makecert", "winpack-no-pvk2pfx");
        let req = MakeCertRequest {
            pvk: PathBuf::from("k.pvk"),
            cer: PathBuf::from("k.cer"),
            subject: None,
            policy: CertPolicy::default(),
        };
        let err = toolchain.make_cert(&req).await.unwrap_err();
        assert!(matches!(err, ProcessError::NotFound { .. }));
        assert_eq!(toolchain.make_cert_tool(), "winpack-no-makecert");
    }
}
