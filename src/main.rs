// Small interactive demo: hash a password, then verify a second entry against it.
//
// usage: bcrypt_rs [cost]

use bcrypt_rs::{normalize_password, BCrypt, LongPasswordStrategy, Version, DEFAULT_COST};
use rpassword::read_password;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cost = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => DEFAULT_COST,
    };
    let bcrypt = BCrypt::new(cost, Version::TwoB, LongPasswordStrategy::Strict)?;

    // Read password securely (without displaying it)
    print!("Enter password to hash: ");
    io::stdout().flush()?;
    let password = normalize_password(&read_password()?)?;

    let hashed = bcrypt.hash(password.as_slice())?;
    println!("\nHashed password: {}", hashed);

    print!("\nEnter password to verify: ");
    io::stdout().flush()?;
    let verify_password = normalize_password(&read_password()?)?;

    let is_valid = bcrypt.verify_strict(verify_password.as_slice(), &hashed)?;
    println!("\nPassword verification: {}", if is_valid { "success" } else { "failed" });

    Ok(())
}
