use std::io::{self, Write};

use hingesdk::client::BoxFuture;
use hingesdk::{
    DeviceIdentity, ErrorDetails, HingeClient, HingeError, OtpCode, OtpCodeProvider,
    RawPhoneNumber,
};

/// Reads the passcode from stdin. Blocks the runtime thread, which is fine
/// for an interactive demo.
struct StdinCodeProvider;

impl OtpCodeProvider for StdinCodeProvider {
    fn otp_code<'a>(&'a self) -> BoxFuture<'a, Result<OtpCode, HingeError>> {
        Box::pin(async move {
            print!("Enter the SMS code: ");
            io::stdout().flush().ok();
            let mut line = String::new();
            io::stdin().read_line(&mut line).map_err(|err| HingeError::Api {
                message: format!("failed to read code from stdin: {err}"),
                details: ErrorDetails::default(),
            })?;
            Ok(OtpCode::new(line)?)
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let phone_raw = std::env::var("HINGE_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "HINGE_PHONE environment variable is required",
        )
    })?;

    let phone = RawPhoneNumber::new(phone_raw)?;
    let client =
        HingeClient::login_with_sms(phone, DeviceIdentity::default(), StdinCodeProvider).await?;

    let session = client.session();
    println!(
        "logged in: user={:?}, session={:?}",
        session.user_id(),
        session.session_id()
    );

    Ok(())
}
