// src/noyau/eval.rs
//
// Évaluation du flux de jetons
// ----------------------------
// 1) comptage des parenthèses (déséquilibre => erreur)
// 2) résolution des paires imbriquées : la dernière '(' avant la première
//    ')' délimite le segment le plus interne ; on le réduit puis on recolle
//    le tout en un seul Nombre
// 3) réduction à plat, priorité par priorité : ** puis / puis * puis + puis -
//
// Tout résultat intermédiaire non fini (division par zéro, 0**-1, …)
// interrompt immédiatement l'évaluation ; l'issue est toujours définie
// (nombre ou erreur), jamais une panique.

use thiserror::Error;

use super::jetons::{Jeton, Operateur};
use super::saisie::Flux;

/// Ordre de réduction des opérateurs (priorité décroissante).
const ORDRE_REDUCTION: [Operateur; 5] = [
    Operateur::Puissance,
    Operateur::Division,
    Operateur::Fois,
    Operateur::Plus,
    Operateur::Moins,
];

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ErreurEval {
    #[error("parenthèses déséquilibrées")]
    ParenthesesDesequilibrees,

    #[error("résultat non fini")]
    NonFini,
}

/// Évalue le flux courant. Le flux n'est pas modifié : on travaille sur copie.
pub fn evaluer(flux: &Flux) -> Result<f64, ErreurEval> {
    if flux.nb_ouvrantes() != flux.nb_fermantes() {
        return Err(ErreurEval::ParenthesesDesequilibrees);
    }

    let mut jetons: Vec<Jeton> = flux.jetons().to_vec();

    // Paires imbriquées d'abord.
    while jetons.iter().any(|j| matches!(j, Jeton::ParOuvrante)) {
        let droite = jetons
            .iter()
            .position(|j| matches!(j, Jeton::ParFermante))
            .ok_or(ErreurEval::ParenthesesDesequilibrees)?;
        let gauche = jetons[..droite]
            .iter()
            .rposition(|j| matches!(j, Jeton::ParOuvrante))
            .ok_or(ErreurEval::ParenthesesDesequilibrees)?;

        let mut interieur: Vec<Jeton> = jetons[gauche + 1..droite].to_vec();
        let valeur = reduit_plat(&mut interieur)?;
        jetons.splice(gauche..=droite, [Jeton::Nombre(valeur)]);
    }

    reduit_plat(&mut jetons)
}

/// Coercition d'un jeton en opérande numérique, juste avant usage.
/// Un texte non parsable vaut NaN (et fera échouer l'opération).
fn valeur_de(jeton: &Jeton) -> f64 {
    match jeton {
        Jeton::Nombre(v) => *v,
        Jeton::Texte(s) => s.parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Réduction d'un segment sans parenthèses.
/// Au sein d'une priorité, balayage de gauche à droite. Cas conservé :
/// un opérateur en fin de segment prend son opérande gauche des deux
/// côtés (5 - => 0, 2 ** => 4) et ne retire que deux jetons.
fn reduit_plat(jetons: &mut Vec<Jeton>) -> Result<f64, ErreurEval> {
    if jetons.is_empty() {
        return Err(ErreurEval::NonFini);
    }

    for op in ORDRE_REDUCTION {
        while let Some(i) = jetons
            .iter()
            .position(|j| matches!(j, Jeton::Operateur(o) if *o == op))
        {
            if i == 0 {
                // opérateur sans opérande gauche : injoignable depuis la
                // saisie, traité comme non calculable
                return Err(ErreurEval::NonFini);
            }

            let a = valeur_de(&jetons[i - 1]);
            let (b, fin) = if i == jetons.len() - 1 {
                (a, i)
            } else {
                (valeur_de(&jetons[i + 1]), i + 1)
            };

            let r = op.applique(a, b);
            if !r.is_finite() {
                return Err(ErreurEval::NonFini);
            }

            jetons.splice(i - 1..=fin, [Jeton::Nombre(r)]);
        }
    }

    // Le segment se réduit à sa tête ; un reliquat textuel doit encore
    // se coercer en nombre fini.
    let r = valeur_de(&jetons[0]);
    if r.is_finite() {
        Ok(r)
    } else {
        Err(ErreurEval::NonFini)
    }
}

#[cfg(test)]
mod tests {
    use super::super::jetons::Operateur;
    use super::super::saisie::{Flux, Parenthese};
    use super::{evaluer, ErreurEval};

    /// Simule une suite de frappes ('^' = **, '±' = signe).
    fn tape(seq: &str) -> Flux {
        let mut flux = Flux::default();
        for c in seq.chars() {
            match c {
                '0'..='9' => flux.ajoute_chiffre(c as u8 - b'0'),
                '+' => flux.ajoute_operateur(Operateur::Plus),
                '-' => flux.ajoute_operateur(Operateur::Moins),
                '*' => flux.ajoute_operateur(Operateur::Fois),
                '/' => flux.ajoute_operateur(Operateur::Division),
                '^' => flux.ajoute_operateur(Operateur::Puissance),
                '(' => flux.ajoute_parenthese(Parenthese::Ouvrante),
                ')' => flux.ajoute_parenthese(Parenthese::Fermante),
                '.' => flux.ajoute_point(),
                '±' => flux.bascule_signe(),
                autre => panic!("frappe inconnue: {autre:?}"),
            }
        }
        flux
    }

    fn eval_ok(seq: &str) -> f64 {
        evaluer(&tape(seq)).unwrap_or_else(|e| panic!("seq={seq:?} err={e}"))
    }

    #[test]
    fn priorites() {
        assert_eq!(eval_ok("2+3*4"), 14.0);
        assert_eq!(eval_ok("(2+3)*4"), 20.0);
        assert_eq!(eval_ok("2^3*2"), 16.0);
    }

    #[test]
    fn meme_priorite_de_gauche_a_droite() {
        assert_eq!(eval_ok("10-2-3"), 5.0);
        assert_eq!(eval_ok("8/4/2"), 1.0);
    }

    #[test]
    fn imbrication() {
        assert_eq!(eval_ok("((2+3)*(4-1))"), 15.0);
        assert_eq!(eval_ok("2*(3+(4/2))"), 10.0);
    }

    #[test]
    fn multiplication_implicite() {
        assert_eq!(eval_ok("2(3)"), 6.0);
        assert_eq!(eval_ok("(2+1)4"), 12.0);
    }

    #[test]
    fn decimaux_et_signes() {
        assert_eq!(eval_ok("0.5*4"), 2.0);
        assert_eq!(eval_ok("1.25+0.75"), 2.0);
        assert_eq!(eval_ok("5±+2"), -3.0);
    }

    #[test]
    fn exposants() {
        assert_eq!(eval_ok("2^10"), 1024.0);
        assert_eq!(eval_ok("9^0.5"), 3.0);
    }

    #[test]
    fn operateur_final_se_replie_sur_son_operande() {
        assert_eq!(eval_ok("5-"), 0.0);
        assert_eq!(eval_ok("2^"), 4.0);
        assert_eq!(eval_ok("3*"), 9.0);
    }

    #[test]
    fn point_residuel_sans_effet() {
        assert_eq!(eval_ok("2."), 2.0);
    }

    #[test]
    fn division_par_zero() {
        assert_eq!(evaluer(&tape("5/0")), Err(ErreurEval::NonFini));
        assert_eq!(evaluer(&tape("2+8/(3-3)")), Err(ErreurEval::NonFini));
    }

    #[test]
    fn zero_puissance_negative() {
        assert_eq!(evaluer(&tape("0^1±")), Err(ErreurEval::NonFini));
    }

    #[test]
    fn parentheses_desequilibrees() {
        assert_eq!(
            evaluer(&tape("(2+3")),
            Err(ErreurEval::ParenthesesDesequilibrees)
        );
        assert_eq!(
            evaluer(&tape("((1)")),
            Err(ErreurEval::ParenthesesDesequilibrees)
        );
    }

    #[test]
    fn flux_non_modifie_par_l_evaluation() {
        let flux = tape("(2+3)*4");
        let avant = flux.clone();
        let _ = evaluer(&flux);
        assert_eq!(flux, avant);
    }
}
