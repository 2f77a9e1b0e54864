//! Claim decoding properties

use finanzas_auth::{decode_claims, usuario_from_claims};
use finanzas_test_utils::{jwt, CLAIM_NAME_IDENTIFIER};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn user_id_comes_from_nameidentifier_or_sub(
        id in "[a-f0-9-]{1,36}",
        use_uri in any::<bool>(),
    ) {
        let payload = if use_uri {
            json!({ CLAIM_NAME_IDENTIFIER: id.clone() })
        } else {
            json!({ "sub": id.clone() })
        };
        let claims = decode_claims(&jwt(&payload)).unwrap();
        let usuario = usuario_from_claims(&claims, None).unwrap();
        prop_assert_eq!(usuario.id.as_str(), id.as_str());
    }

    #[test]
    fn nombre_falls_back_to_email_local_part(
        local in "[a-z][a-z0-9._]{0,15}",
        domain in "[a-z]{1,10}\\.(es|com)",
    ) {
        let email = format!("{local}@{domain}");
        let claims = decode_claims(&jwt(&json!({ "sub": "u", "email": email }))).unwrap();
        let usuario = usuario_from_claims(&claims, None).unwrap();
        prop_assert_eq!(usuario.nombre, local);
        prop_assert_eq!(usuario.correo, email);
    }

    #[test]
    fn arbitrary_strings_never_panic(token in ".{0,64}") {
        let _ = decode_claims(&token);
    }
}
