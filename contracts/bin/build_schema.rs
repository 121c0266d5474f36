#[doc(hidden)]
pub use cspr_fot_contracts;

extern "Rust" {
    fn module_schema() -> odra::contract_def::ContractBlueprint;
    fn casper_contract_schema() -> odra::schema::casper_contract_schema::ContractSchema;
}

fn main() {
    odra_build::schema(
        unsafe { crate::module_schema() },
        unsafe { crate::casper_contract_schema() },
    );
}
