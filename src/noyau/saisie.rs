// src/noyau/saisie.rs
//
// Flux de jetons + réduction de saisie
// ------------------------------------
// Une méthode par action logique du pavé ; chaque action mute le flux,
// l'appelant re-formate ensuite l'affichage.
//
// Contrats :
// - jamais deux opérateurs adjacents (le second remplace le premier)
// - un opérateur juste après '(' est ignoré
// - multiplication implicite entre ')' et l'opérande qui suit
// - une fermante n'est acceptée que si le compte d'ouvrantes la couvre ;
//   un opérateur pendu ou un groupe vide juste avant ')' est retiré
// - le littéral de queue reste textuel tant qu'un zéro final ou un signe
//   posé sur zéro doit survivre tel quel
// - les actions structurellement invalides sont ignorées en silence

use super::eval;
use super::format;
use super::jetons::{format_nombre, Jeton, Operateur};
use super::memoire::Memoire;

/// Côté d'une parenthèse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parenthese {
    Ouvrante,
    Fermante,
}

/// Action logique issue du collaborateur UI (un événement = une touche).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Touche {
    Chiffre(u8),
    Operateur(Operateur),
    Point,
    Parenthese(Parenthese),
    Signe,
    Retour,
    Reponse,
}

/// Suite ordonnée de jetons : c'est l'expression, de gauche à droite.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flux {
    jetons: Vec<Jeton>,
}

impl Flux {
    pub fn jetons(&self) -> &[Jeton] {
        &self.jetons
    }

    pub fn est_vide(&self) -> bool {
        self.jetons.is_empty()
    }

    pub fn vide(&mut self) {
        self.jetons.clear();
    }

    pub fn nb_ouvrantes(&self) -> usize {
        self.jetons
            .iter()
            .filter(|j| matches!(j, Jeton::ParOuvrante))
            .count()
    }

    pub fn nb_fermantes(&self) -> usize {
        self.jetons
            .iter()
            .filter(|j| matches!(j, Jeton::ParFermante))
            .count()
    }

    /// Copie du jeton de queue (None sur flux vide).
    fn queue(&self) -> Option<Jeton> {
        self.jetons.last().cloned()
    }

    /// Retire le point en attente + le littéral juste avant, et rend leur
    /// forme textuelle jointe (ex: "12.").
    fn retire_litteral_et_point(&mut self) -> String {
        let point = self.jetons.pop().map(|j| j.texte()).unwrap_or_default();
        let litteral = self.jetons.pop().map(|j| j.texte()).unwrap_or_default();
        format!("{litteral}{point}")
    }

    /// Engage le littéral en attente de point comme entier :
    /// la frappe "12." suivie d'un opérateur ou d'une parenthèse vaut 12.
    fn engage_point_en_entier(&mut self) -> f64 {
        let texte = self.retire_litteral_et_point();
        texte.trim_end_matches('.').parse().unwrap_or(f64::NAN)
    }

    /* ------------------------ Actions du pavé ------------------------ */

    /// Chiffre 0–9.
    pub fn ajoute_chiffre(&mut self, chiffre: u8) {
        // garde-fou : le pavé n'émet que 0–9
        let chiffre = chiffre.min(9);

        match self.queue() {
            None | Some(Jeton::Operateur(_)) | Some(Jeton::ParOuvrante) => {
                self.jetons.push(Jeton::Nombre(f64::from(chiffre)));
            }

            // premier chiffre de la partie fractionnaire
            Some(Jeton::Point) => {
                let texte = format!("{}{}", self.retire_litteral_et_point(), chiffre);
                let jeton = if chiffre == 0 {
                    // zéro final : textuel tant qu'un chiffre non nul n'a pas
                    // refermé le littéral
                    Jeton::Texte(texte)
                } else {
                    reparse(texte)
                };
                self.jetons.push(jeton);
            }

            Some(Jeton::ParFermante) => {
                self.jetons.push(Jeton::Operateur(Operateur::Fois));
                self.jetons.push(Jeton::Nombre(f64::from(chiffre)));
            }

            Some(queue @ Jeton::Nombre(_)) | Some(queue @ Jeton::Texte(_)) => {
                self.jetons.pop();
                let jeton = match (&queue, chiffre) {
                    // "-0" + 0 => "-00" : la forme écrite survit telle quelle
                    (Jeton::Texte(s), 0) => Jeton::Texte(format!("{s}0")),
                    _ => reparse(format!("{}{}", queue.texte(), chiffre)),
                };
                self.jetons.push(jeton);
            }
        }
    }

    /// Opérateur binaire. Ignoré après '(' ; remplace un opérateur de queue.
    pub fn ajoute_operateur(&mut self, op: Operateur) {
        match self.queue() {
            Some(Jeton::ParOuvrante) => {}

            Some(Jeton::Point) => {
                let entier = self.engage_point_en_entier();
                self.jetons.push(Jeton::Nombre(entier));
                self.jetons.push(Jeton::Operateur(op));
            }

            Some(Jeton::Operateur(_)) => {
                self.jetons.pop();
                self.jetons.push(Jeton::Operateur(op));
            }

            _ => self.jetons.push(Jeton::Operateur(op)),
        }
    }

    /// Point décimal. Un seul point par littéral ; ailleurs qu'après un
    /// entier, le zéro de tête est posé d'office ("0.").
    pub fn ajoute_point(&mut self) {
        match self.queue() {
            None | Some(Jeton::Operateur(_)) | Some(Jeton::ParOuvrante) => {
                self.jetons.push(Jeton::Texte("0".to_string()));
                self.jetons.push(Jeton::Point);
            }

            Some(Jeton::Point) => {}

            Some(Jeton::Nombre(v)) if v.fract() == 0.0 => self.jetons.push(Jeton::Point),

            Some(Jeton::ParFermante) => {
                self.jetons.push(Jeton::Operateur(Operateur::Fois));
                self.jetons.push(Jeton::Texte("0".to_string()));
                self.jetons.push(Jeton::Point);
            }

            // littéral non entier ou textuel : déjà pointé, rien à faire
            _ => {}
        }
    }

    /// Parenthèse ouvrante ou fermante.
    pub fn ajoute_parenthese(&mut self, p: Parenthese) {
        let Some(queue) = self.queue() else {
            if p == Parenthese::Ouvrante {
                self.jetons.push(Jeton::ParOuvrante);
            }
            return;
        };

        match p {
            Parenthese::Ouvrante => match queue {
                Jeton::Point => {
                    let entier = self.engage_point_en_entier();
                    self.jetons.push(Jeton::Nombre(entier));
                    self.jetons.push(Jeton::Operateur(Operateur::Fois));
                    self.jetons.push(Jeton::ParOuvrante);
                }
                Jeton::Operateur(_) | Jeton::ParOuvrante => {
                    self.jetons.push(Jeton::ParOuvrante);
                }
                // multiplication implicite devant le groupe
                _ => {
                    self.jetons.push(Jeton::Operateur(Operateur::Fois));
                    self.jetons.push(Jeton::ParOuvrante);
                }
            },

            Parenthese::Fermante => {
                if self.nb_ouvrantes() <= self.nb_fermantes() {
                    return;
                }
                match queue {
                    Jeton::Point => {
                        let entier = self.engage_point_en_entier();
                        self.jetons.push(Jeton::Nombre(entier));
                        self.jetons.push(Jeton::ParFermante);
                    }
                    // opérateur pendu : retiré avant de fermer
                    Jeton::Operateur(_) => {
                        self.jetons.pop();
                        self.jetons.push(Jeton::ParFermante);
                    }
                    // groupe vide : l'ouvrante s'en va, rien à fermer
                    Jeton::ParOuvrante => {
                        self.jetons.pop();
                    }
                    _ => self.jetons.push(Jeton::ParFermante),
                }
            }
        }
    }

    /// Bascule du signe de l'opérande de queue.
    /// Inerte sur opérateur ou parenthèse (le signe porte sur un opérande).
    pub fn bascule_signe(&mut self) {
        match self.queue() {
            None
            | Some(Jeton::Operateur(_))
            | Some(Jeton::ParOuvrante)
            | Some(Jeton::ParFermante) => {}

            // point en attente : le signe porte sur le littéral juste avant ;
            // zéro devient "-0" textuel (la négation numérique suivie du
            // point re-parserait en perdant la forme écrite)
            Some(Jeton::Point) => {
                let n = self.jetons.len();
                if n < 2 {
                    return;
                }
                self.jetons[n - 2] = match self.jetons[n - 2].clone() {
                    Jeton::Nombre(v) if v == 0.0 => Jeton::Texte("-0".to_string()),
                    Jeton::Nombre(v) => Jeton::Nombre(-v),
                    Jeton::Texte(s) => Jeton::Texte(bascule_prefixe(&s)),
                    autre => autre,
                };
            }

            Some(Jeton::Texte(s)) => {
                let n = self.jetons.len();
                self.jetons[n - 1] = Jeton::Texte(bascule_prefixe(&s));
            }

            // négation arithmétique simple (celle de -0.0 s'écrit déjà "-0")
            Some(Jeton::Nombre(v)) => {
                let n = self.jetons.len();
                self.jetons[n - 1] = Jeton::Nombre(-v);
            }
        }
    }

    /// Annulation : retire exactement une unité de frappe.
    /// - opérateur ou parenthèse : le jeton entier
    /// - point en attente : le point (et le "0" posé d'office avec lui)
    /// - littéral : son dernier caractère (le jeton tombe une fois vide)
    pub fn annule(&mut self) {
        match self.queue() {
            None => {}

            Some(Jeton::Operateur(_)) | Some(Jeton::ParOuvrante) | Some(Jeton::ParFermante) => {
                self.jetons.pop();
            }

            Some(Jeton::Point) => {
                self.jetons.pop();
                if matches!(self.jetons.last(), Some(Jeton::Texte(s)) if s == "0") {
                    self.jetons.pop();
                }
            }

            Some(queue) => {
                self.jetons.pop();
                let mut texte = queue.texte();
                texte.pop();
                if !texte.is_empty() {
                    self.jetons.push(Jeton::Texte(texte));
                }
            }
        }
    }

    /// Rappel de la dernière réponse, ajoutée comme nouvel opérande.
    pub fn rappelle_reponse(&mut self, memoire: &Memoire) {
        if let Some(v) = memoire.rappelable() {
            self.jetons.push(Jeton::Nombre(v));
        }
    }
}

/// Re-parse une forme textuelle en Nombre (textuel si le parse échoue,
/// cas du littéral réduit à "-" après annulation).
fn reparse(texte: String) -> Jeton {
    match texte.parse::<f64>() {
        Ok(v) => Jeton::Nombre(v),
        Err(_) => Jeton::Texte(texte),
    }
}

/// Préfixe '-' d'un littéral textuel, ajouté ou retiré.
fn bascule_prefixe(s: &str) -> String {
    match s.strip_prefix('-') {
        Some(reste) => reste.to_string(),
        None => format!("-{s}"),
    }
}

/* ------------------------ Session de calcul ------------------------ */

/// Sentinelle d'échec : seule valeur non numérique jamais écrite en résultat.
pub const ERREUR: &str = "ERROR";

/// Façade de session : le flux en cours + la mémoire de réponse.
/// La mémoire survit aux remises à zéro du flux.
#[derive(Clone, Debug, Default)]
pub struct Calculatrice {
    flux: Flux,
    memoire: Memoire,
}

impl Calculatrice {
    /// Applique une action logique au flux.
    /// Un opérateur sur flux vide est ignoré (rien à relier).
    pub fn applique(&mut self, touche: Touche) {
        match touche {
            Touche::Chiffre(c) => self.flux.ajoute_chiffre(c),
            Touche::Operateur(op) => {
                if !self.flux.est_vide() {
                    self.flux.ajoute_operateur(op);
                }
            }
            Touche::Point => self.flux.ajoute_point(),
            Touche::Parenthese(p) => self.flux.ajoute_parenthese(p),
            Touche::Signe => self.flux.bascule_signe(),
            Touche::Retour => self.flux.annule(),
            Touche::Reponse => self.flux.rappelle_reponse(&self.memoire),
        }
    }

    /// Chaîne d'affichage du flux courant.
    pub fn affichage(&self) -> String {
        format::affiche(&self.flux)
    }

    /// Touche "=" : évalue, dépose l'issue en mémoire, vide le flux.
    /// None sur flux vide (la touche n'a alors aucun effet).
    pub fn egal(&mut self) -> Option<String> {
        if self.flux.est_vide() {
            return None;
        }

        let issue = eval::evaluer(&self.flux);
        self.memoire.depose(&issue);
        self.flux.vide();

        Some(match issue {
            Ok(v) => format_nombre(v),
            Err(_) => ERREUR.to_string(),
        })
    }

    pub fn est_vide(&self) -> bool {
        self.flux.est_vide()
    }

    /// Remise à zéro du flux (la mémoire de réponse est conservée).
    pub fn vide(&mut self) {
        self.flux.vide();
    }

    #[cfg(test)]
    pub fn flux(&self) -> &Flux {
        &self.flux
    }
}

#[cfg(test)]
mod tests {
    use super::super::jetons::{Jeton, Operateur};
    use super::{Flux, Memoire, Parenthese};

    /// Simule une suite de frappes ('^' = **, '±' = signe, '<' = annulation).
    fn tape(flux: &mut Flux, seq: &str) {
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
                '<' => flux.annule(),
                autre => panic!("frappe inconnue: {autre:?}"),
            }
        }
    }

    fn frappe(seq: &str) -> Flux {
        let mut flux = Flux::default();
        tape(&mut flux, seq);
        flux
    }

    fn textes(flux: &Flux) -> Vec<String> {
        flux.jetons().iter().map(|j| j.texte()).collect()
    }

    #[test]
    fn chiffres_concatenes_en_un_litteral() {
        let flux = frappe("907");
        assert_eq!(flux.jetons(), [Jeton::Nombre(907.0)]);
    }

    #[test]
    fn operateur_remplace_le_precedent() {
        assert_eq!(textes(&frappe("2+*")), ["2", "*"]);
        assert_eq!(textes(&frappe("2*^")), ["2", "**"]);
    }

    #[test]
    fn operateur_apres_ouvrante_ignore() {
        assert_eq!(textes(&frappe("(+")), ["("]);
    }

    #[test]
    fn multiplication_implicite() {
        // après une fermante : chiffre, point, ouvrante
        assert_eq!(textes(&frappe("(2)3")), ["(", "2", ")", "*", "3"]);
        assert_eq!(textes(&frappe("(2).")), ["(", "2", ")", "*", "0", "."]);
        assert_eq!(textes(&frappe("2(")), ["2", "*", "("]);
    }

    #[test]
    fn point_pose_le_zero_de_tete() {
        assert_eq!(textes(&frappe(".5")), ["0.5"]);
        assert_eq!(textes(&frappe("2+.")), ["2", "+", "0", "."]);
    }

    #[test]
    fn point_unique_par_litteral() {
        let flux = frappe("12.5");
        assert_eq!(flux.jetons(), [Jeton::Nombre(12.5)]);

        // second point ignoré
        assert_eq!(textes(&frappe("1..")), ["1", "."]);
        assert_eq!(textes(&frappe("1.5.")), ["1.5"]);
    }

    #[test]
    fn zero_fractionnaire_reste_textuel() {
        // "1.0" tel quel pendant la frappe, re-parse au premier chiffre non nul
        let flux = frappe("1.0");
        assert_eq!(flux.jetons(), [Jeton::Texte("1.0".to_string())]);

        let flux = frappe("1.005");
        assert_eq!(flux.jetons(), [Jeton::Nombre(1.005)]);
    }

    #[test]
    fn point_engage_en_entier_par_operateur() {
        assert_eq!(textes(&frappe("12.+3")), ["12", "+", "3"]);
        assert_eq!(textes(&frappe("2.(")), ["2", "*", "("]);
    }

    #[test]
    fn fermante_sans_ouvrante_rejetee() {
        assert_eq!(textes(&frappe(")")), Vec::<String>::new());
        assert_eq!(textes(&frappe("2)")), ["2"]);
    }

    #[test]
    fn fermante_ejecte_l_operateur_pendu() {
        assert_eq!(textes(&frappe("(2+)")), ["(", "2", ")"]);
    }

    #[test]
    fn groupe_vide_abandonne() {
        assert_eq!(textes(&frappe("(()")), ["("]);
        assert_eq!(textes(&frappe("()")), Vec::<String>::new());
    }

    #[test]
    fn fermante_engage_le_point() {
        assert_eq!(textes(&frappe("(2.)")), ["(", "2", ")"]);
    }

    #[test]
    fn signe_aller_retour() {
        assert_eq!(textes(&frappe("5±")), ["-5"]);
        assert_eq!(textes(&frappe("5±±")), ["5"]);

        // zéro : la forme écrite "-0" survit, l'aller-retour rend "0"
        assert_eq!(textes(&frappe("0±")), ["-0"]);
        assert_eq!(textes(&frappe("0±±")), ["0"]);
        assert_eq!(textes(&frappe("0.±")), ["-0", "."]);
        assert_eq!(textes(&frappe("0.±±")), ["0", "."]);
    }

    #[test]
    fn signe_sur_point_en_attente_porte_sur_le_litteral() {
        assert_eq!(textes(&frappe("12.±")), ["-12", "."]);
        assert_eq!(textes(&frappe("12.±5")), ["-12.5"]);
    }

    #[test]
    fn signe_inerte_sur_operateur_et_parentheses() {
        assert_eq!(textes(&frappe("2+±")), ["2", "+"]);
        assert_eq!(textes(&frappe("(±")), ["("]);
        assert_eq!(textes(&frappe("(2)±")), ["(", "2", ")"]);
    }

    #[test]
    fn annulation_retire_une_unite() {
        assert_eq!(textes(&frappe("2+3<")), ["2", "+"]);
        assert_eq!(textes(&frappe("23<")), ["2"]);
        assert_eq!(textes(&frappe("(2<<")), Vec::<String>::new());
    }

    #[test]
    fn annulation_du_point() {
        // point seul : le littéral entier reste
        assert_eq!(textes(&frappe("12.<")), ["12"]);
        // zéro posé d'office : il repart avec le point
        assert_eq!(textes(&frappe(".<")), Vec::<String>::new());
        // "-0." : le point seulement, puis caractère par caractère
        assert_eq!(textes(&frappe(".±<")), ["-0"]);
        assert_eq!(textes(&frappe(".±<<")), ["-"]);
        assert_eq!(textes(&frappe(".±<<<")), Vec::<String>::new());
    }

    #[test]
    fn annulation_sur_vide_inerte() {
        let mut flux = Flux::default();
        flux.annule();
        assert!(flux.est_vide());
    }

    #[test]
    fn rappel_selon_memoire() {
        let mut flux = Flux::default();
        flux.rappelle_reponse(&Memoire::Valeur(4.0));
        assert_eq!(flux.jetons(), [Jeton::Nombre(4.0)]);

        let mut flux = Flux::default();
        flux.rappelle_reponse(&Memoire::Vide);
        flux.rappelle_reponse(&Memoire::Erreur);
        assert!(flux.est_vide());
    }
}
