fn main() -> Result<(), Box<dyn std::error::Error>> {
    let fds = protox::compile(["proto/inventory.proto"], ["proto"])?;
    tonic_build::configure().compile_fds(fds)?;
    Ok(())
}
