use anyhow::Result;

fn main() -> Result<()> {
    solflow_lib::main()
}
