use kube::core::CustomResourceExt;
use kc_operator::crd::{Keycloak, KeycloakBackup};

fn main() -> Result<(), serde_yaml::Error> {
    for crd in [Keycloak::crd(), KeycloakBackup::crd()] {
        println!("---");
        print!("{}", serde_yaml::to_string(&crd)?);
    }
    Ok(())
}
