//! Runtime helper functions.
//!
//! Some collection operations have no single-expression spelling on a
//! target. Those lower to a call to a small helper whose definition is
//! emitted once into the preamble, only when a program uses it.

use crate::CodegenTarget;

/// A runtime helper function.
///
/// Variants are ordered lista, tabula, copia; the preamble emits helper
/// definitions in this order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Helper {
    ListaAddita,
    ListaPraeposita,
    ListaRemove,
    ListaDecapita,
    ListaIndiceDe,
    ListaInveniIndicem,
    ListaOrdinata,
    ListaInversa,
    ListaUnica,
    ListaUltima,
    ListaConiunge,
    ListaCongrega,
    ListaPartire,
    ListaMiscita,
    ListaFragmenta,
    TabulaConflata,
    TabulaInversa,
    TabulaSelecta,
    TabulaOmissa,
    TabulaInLista,
    CopiaUnio,
    CopiaIntersectio,
    CopiaDifferentia,
    CopiaSymmetrica,
    CopiaSubcopia,
    CopiaSupercopia,
    CopiaInLista,
}

impl Helper {
    /// Name the generated code calls the helper by.
    pub const fn fn_name(self) -> &'static str {
        match self {
            Helper::ListaAddita => "lista_addita",
            Helper::ListaPraeposita => "lista_praeposita",
            Helper::ListaRemove => "lista_remove",
            Helper::ListaDecapita => "lista_decapita",
            Helper::ListaIndiceDe => "lista_indice_de",
            Helper::ListaInveniIndicem => "lista_inveni_indicem",
            Helper::ListaOrdinata => "lista_ordinata",
            Helper::ListaInversa => "lista_inversa",
            Helper::ListaUnica => "lista_unica",
            Helper::ListaUltima => "lista_ultima",
            Helper::ListaConiunge => "lista_coniunge",
            Helper::ListaCongrega => "lista_congrega",
            Helper::ListaPartire => "lista_partire",
            Helper::ListaMiscita => "lista_miscita",
            Helper::ListaFragmenta => "lista_fragmenta",
            Helper::TabulaConflata => "tabula_conflata",
            Helper::TabulaInversa => "tabula_inversa",
            Helper::TabulaSelecta => "tabula_selecta",
            Helper::TabulaOmissa => "tabula_omissa",
            Helper::TabulaInLista => "tabula_in_lista",
            Helper::CopiaUnio => "copia_unio",
            Helper::CopiaIntersectio => "copia_intersectio",
            Helper::CopiaDifferentia => "copia_differentia",
            Helper::CopiaSymmetrica => "copia_symmetrica",
            Helper::CopiaSubcopia => "copia_subcopia",
            Helper::CopiaSupercopia => "copia_supercopia",
            Helper::CopiaInLista => "copia_in_lista",
        }
    }

    /// Source text of the helper on `target`, if the target has one.
    pub fn definition(self, target: CodegenTarget) -> Option<&'static str> {
        match target {
            CodegenTarget::TypeScript => typescript_definition(self),
            CodegenTarget::Python => python_definition(self),
            CodegenTarget::Rust => rust_definition(self),
            CodegenTarget::Cpp => cpp_definition(self),
            CodegenTarget::Zig | CodegenTarget::Faber => None,
        }
    }
}

fn typescript_definition(helper: Helper) -> Option<&'static str> {
    let def = match helper {
        Helper::ListaPartire => {
            "function lista_partire<T>(items: T[], pred: (x: T) => boolean): [T[], T[]] {
  const truthy: T[] = [];
  const falsy: T[] = [];
  for (const item of items) {
    (pred(item) ? truthy : falsy).push(item);
  }
  return [truthy, falsy];
}"
        }
        Helper::ListaMiscita => {
            "function lista_miscita<T>(items: T[]): T[] {
  const result = [...items];
  for (let i = result.length - 1; i > 0; i--) {
    const j = Math.floor(Math.random() * (i + 1));
    [result[i], result[j]] = [result[j], result[i]];
  }
  return result;
}"
        }
        Helper::ListaFragmenta => {
            "function lista_fragmenta<T>(items: T[], n: number): T[][] {
  const result: T[][] = [];
  for (let i = 0; i < items.length; i += n) {
    result.push(items.slice(i, i + n));
  }
  return result;
}"
        }
        _ => return None,
    };
    Some(def)
}

fn python_definition(helper: Helper) -> Option<&'static str> {
    let def = match helper {
        Helper::ListaCongrega => {
            "def lista_congrega(items, key):
    groups = {}
    for item in items:
        groups.setdefault(key(item), []).append(item)
    return groups"
        }
        Helper::ListaPartire => {
            "def lista_partire(items, pred):
    truthy, falsy = [], []
    for item in items:
        (truthy if pred(item) else falsy).append(item)
    return truthy, falsy"
        }
        Helper::ListaMiscita => {
            "def lista_miscita(items):
    result = list(items)
    random.shuffle(result)
    return result"
        }
        Helper::ListaFragmenta => {
            "def lista_fragmenta(items, n):
    return [items[i:i + n] for i in range(0, len(items), n)]"
        }
        _ => return None,
    };
    Some(def)
}

fn rust_definition(helper: Helper) -> Option<&'static str> {
    let def = match helper {
        Helper::TabulaConflata => {
            "fn tabula_conflata<K: Clone + Eq + std::hash::Hash, V: Clone>(a: &HashMap<K, V>, b: &HashMap<K, V>) -> HashMap<K, V> {
    let mut result = a.clone();
    result.extend(b.iter().map(|(k, v)| (k.clone(), v.clone())));
    result
}"
        }
        Helper::TabulaInversa => {
            "fn tabula_inversa<K: Clone, V: Clone + Eq + std::hash::Hash>(map: &HashMap<K, V>) -> HashMap<V, K> {
    map.iter().map(|(k, v)| (v.clone(), k.clone())).collect()
}"
        }
        Helper::TabulaSelecta => {
            "fn tabula_selecta<K: Clone + Eq + std::hash::Hash, V: Clone>(map: &HashMap<K, V>, keys: &[K]) -> HashMap<K, V> {
    map.iter().filter(|(k, _)| keys.contains(k)).map(|(k, v)| (k.clone(), v.clone())).collect()
}"
        }
        Helper::TabulaOmissa => {
            "fn tabula_omissa<K: Clone + Eq + std::hash::Hash, V: Clone>(map: &HashMap<K, V>, keys: &[K]) -> HashMap<K, V> {
    map.iter().filter(|(k, _)| !keys.contains(k)).map(|(k, v)| (k.clone(), v.clone())).collect()
}"
        }
        Helper::TabulaInLista => {
            "fn tabula_in_lista<K: Clone, V: Clone>(map: &HashMap<K, V>) -> Vec<(K, V)> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}"
        }
        Helper::CopiaUnio => {
            "fn copia_unio<T: Clone + Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> HashSet<T> {
    a.union(b).cloned().collect()
}"
        }
        Helper::CopiaIntersectio => {
            "fn copia_intersectio<T: Clone + Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> HashSet<T> {
    a.intersection(b).cloned().collect()
}"
        }
        Helper::CopiaDifferentia => {
            "fn copia_differentia<T: Clone + Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> HashSet<T> {
    a.difference(b).cloned().collect()
}"
        }
        Helper::CopiaSymmetrica => {
            "fn copia_symmetrica<T: Clone + Eq + std::hash::Hash>(a: &HashSet<T>, b: &HashSet<T>) -> HashSet<T> {
    a.symmetric_difference(b).cloned().collect()
}"
        }
        Helper::CopiaInLista => {
            "fn copia_in_lista<T: Clone>(set: &HashSet<T>) -> Vec<T> {
    set.iter().cloned().collect()
}"
        }
        Helper::ListaAddita => {
            "fn lista_addita<T: Clone>(list: &[T], elem: T) -> Vec<T> {
    let mut result = list.to_vec();
    result.push(elem);
    result
}"
        }
        Helper::ListaPraeposita => {
            "fn lista_praeposita<T: Clone>(list: &[T], elem: T) -> Vec<T> {
    let mut result = vec![elem];
    result.extend(list.iter().cloned());
    result
}"
        }
        Helper::ListaOrdinata => {
            "fn lista_ordinata<T: Clone + Ord>(list: &[T]) -> Vec<T> {
    let mut result = list.to_vec();
    result.sort();
    result
}"
        }
        Helper::ListaUnica => {
            "fn lista_unica<T: Clone + Eq + std::hash::Hash>(list: &[T]) -> Vec<T> {
    let mut seen = HashSet::new();
    list.iter().filter(|x| seen.insert((*x).clone())).cloned().collect()
}"
        }
        Helper::ListaUltima => {
            "fn lista_ultima<T: Clone>(list: &[T], n: usize) -> Vec<T> {
    list[list.len().saturating_sub(n)..].to_vec()
}"
        }
        Helper::ListaCongrega => {
            "fn lista_congrega<T: Clone, K: Eq + std::hash::Hash>(list: &[T], key_fn: impl Fn(&T) -> K) -> HashMap<K, Vec<T>> {
    let mut result: HashMap<K, Vec<T>> = HashMap::new();
    for item in list {
        result.entry(key_fn(item)).or_default().push(item.clone());
    }
    result
}"
        }
        Helper::ListaPartire => {
            "fn lista_partire<T: Clone>(list: &[T], pred: impl Fn(&T) -> bool) -> (Vec<T>, Vec<T>) {
    list.iter().cloned().partition(|x| pred(x))
}"
        }
        _ => return None,
    };
    Some(def)
}

fn cpp_definition(helper: Helper) -> Option<&'static str> {
    let def = match helper {
        Helper::TabulaConflata => {
            "template <typename K, typename V>
std::unordered_map<K, V> tabula_conflata(const std::unordered_map<K, V>& a, const std::unordered_map<K, V>& b) {
    auto result = a;
    for (const auto& [k, v] : b) result[k] = v;
    return result;
}"
        }
        Helper::TabulaInversa => {
            "template <typename K, typename V>
std::unordered_map<V, K> tabula_inversa(const std::unordered_map<K, V>& map) {
    std::unordered_map<V, K> result;
    for (const auto& [k, v] : map) result[v] = k;
    return result;
}"
        }
        Helper::TabulaSelecta => {
            "template <typename K, typename V>
std::unordered_map<K, V> tabula_selecta(const std::unordered_map<K, V>& map, const std::vector<K>& keys) {
    std::unordered_set<K> key_set(keys.begin(), keys.end());
    std::unordered_map<K, V> result;
    for (const auto& [k, v] : map) {
        if (key_set.contains(k)) result[k] = v;
    }
    return result;
}"
        }
        Helper::TabulaOmissa => {
            "template <typename K, typename V>
std::unordered_map<K, V> tabula_omissa(const std::unordered_map<K, V>& map, const std::vector<K>& keys) {
    std::unordered_set<K> key_set(keys.begin(), keys.end());
    std::unordered_map<K, V> result;
    for (const auto& [k, v] : map) {
        if (!key_set.contains(k)) result[k] = v;
    }
    return result;
}"
        }
        Helper::TabulaInLista => {
            "template <typename K, typename V>
std::vector<std::pair<K, V>> tabula_in_lista(const std::unordered_map<K, V>& map) {
    return std::vector<std::pair<K, V>>(map.begin(), map.end());
}"
        }
        Helper::CopiaUnio => {
            "template <typename T>
std::unordered_set<T> copia_unio(const std::unordered_set<T>& a, const std::unordered_set<T>& b) {
    auto result = a;
    result.insert(b.begin(), b.end());
    return result;
}"
        }
        Helper::CopiaIntersectio => {
            "template <typename T>
std::unordered_set<T> copia_intersectio(const std::unordered_set<T>& a, const std::unordered_set<T>& b) {
    std::unordered_set<T> result;
    for (const auto& x : a) {
        if (b.contains(x)) result.insert(x);
    }
    return result;
}"
        }
        Helper::CopiaDifferentia => {
            "template <typename T>
std::unordered_set<T> copia_differentia(const std::unordered_set<T>& a, const std::unordered_set<T>& b) {
    std::unordered_set<T> result;
    for (const auto& x : a) {
        if (!b.contains(x)) result.insert(x);
    }
    return result;
}"
        }
        Helper::CopiaSymmetrica => {
            "template <typename T>
std::unordered_set<T> copia_symmetrica(const std::unordered_set<T>& a, const std::unordered_set<T>& b) {
    std::unordered_set<T> result;
    for (const auto& x : a) {
        if (!b.contains(x)) result.insert(x);
    }
    for (const auto& x : b) {
        if (!a.contains(x)) result.insert(x);
    }
    return result;
}"
        }
        Helper::CopiaSubcopia => {
            "template <typename T>
bool copia_subcopia(const std::unordered_set<T>& a, const std::unordered_set<T>& b) {
    for (const auto& x : a) {
        if (!b.contains(x)) return false;
    }
    return true;
}"
        }
        Helper::CopiaSupercopia => {
            "template <typename T>
bool copia_supercopia(const std::unordered_set<T>& a, const std::unordered_set<T>& b) {
    for (const auto& x : b) {
        if (!a.contains(x)) return false;
    }
    return true;
}"
        }
        Helper::CopiaInLista => {
            "template <typename T>
std::vector<T> copia_in_lista(const std::unordered_set<T>& set) {
    return std::vector<T>(set.begin(), set.end());
}"
        }
        Helper::ListaAddita => {
            "template <typename T>
std::vector<T> lista_addita(const std::vector<T>& list, const T& elem) {
    auto result = list;
    result.push_back(elem);
    return result;
}"
        }
        Helper::ListaPraeposita => {
            "template <typename T>
std::vector<T> lista_praeposita(const std::vector<T>& list, const T& elem) {
    std::vector<T> result;
    result.reserve(list.size() + 1);
    result.push_back(elem);
    result.insert(result.end(), list.begin(), list.end());
    return result;
}"
        }
        Helper::ListaRemove => {
            "template <typename T>
T lista_remove(std::vector<T>& list) {
    auto v = list.back();
    list.pop_back();
    return v;
}"
        }
        Helper::ListaDecapita => {
            "template <typename T>
T lista_decapita(std::vector<T>& list) {
    auto v = list.front();
    list.erase(list.begin());
    return v;
}"
        }
        Helper::ListaIndiceDe => {
            "template <typename T>
int64_t lista_indice_de(const std::vector<T>& list, const T& elem) {
    auto it = std::find(list.begin(), list.end(), elem);
    return it != list.end() ? std::distance(list.begin(), it) : -1;
}"
        }
        Helper::ListaInveniIndicem => {
            "template <typename T, typename Pred>
int64_t lista_inveni_indicem(const std::vector<T>& list, Pred pred) {
    auto it = std::find_if(list.begin(), list.end(), pred);
    return it != list.end() ? std::distance(list.begin(), it) : -1;
}"
        }
        Helper::ListaOrdinata => {
            "template <typename T>
std::vector<T> lista_ordinata(const std::vector<T>& list) {
    auto result = list;
    std::ranges::sort(result);
    return result;
}"
        }
        Helper::ListaInversa => {
            "template <typename T>
std::vector<T> lista_inversa(const std::vector<T>& list) {
    return std::vector<T>(list.rbegin(), list.rend());
}"
        }
        Helper::ListaUnica => {
            "template <typename T>
std::vector<T> lista_unica(const std::vector<T>& list) {
    std::unordered_set<T> seen;
    std::vector<T> result;
    for (const auto& x : list) {
        if (seen.insert(x).second) result.push_back(x);
    }
    return result;
}"
        }
        Helper::ListaUltima => {
            "template <typename T>
std::vector<T> lista_ultima(const std::vector<T>& list, size_t n) {
    if (n >= list.size()) return list;
    return std::vector<T>(list.end() - n, list.end());
}"
        }
        Helper::ListaConiunge => {
            "template <typename T>
std::string lista_coniunge(const std::vector<T>& list, const std::string& sep) {
    std::string result;
    for (size_t i = 0; i < list.size(); ++i) {
        if (i > 0) result += sep;
        if constexpr (std::is_same_v<T, std::string>) {
            result += list[i];
        } else {
            result += std::to_string(list[i]);
        }
    }
    return result;
}"
        }
        Helper::ListaCongrega => {
            "template <typename T, typename KeyFn>
auto lista_congrega(const std::vector<T>& list, KeyFn key_fn) {
    std::unordered_map<std::invoke_result_t<KeyFn, const T&>, std::vector<T>> result;
    for (const auto& x : list) result[key_fn(x)].push_back(x);
    return result;
}"
        }
        Helper::ListaPartire => {
            "template <typename T, typename Pred>
std::pair<std::vector<T>, std::vector<T>> lista_partire(const std::vector<T>& list, Pred pred) {
    std::vector<T> truthy, falsy;
    for (const auto& x : list) (pred(x) ? truthy : falsy).push_back(x);
    return {truthy, falsy};
}"
        }
        Helper::ListaMiscita => {
            "template <typename T>
std::vector<T> lista_miscita(const std::vector<T>& list) {
    auto result = list;
    std::mt19937 g(std::random_device{}());
    std::ranges::shuffle(result, g);
    return result;
}"
        }
        Helper::ListaFragmenta => {
            "template <typename T>
std::vector<std::vector<T>> lista_fragmenta(const std::vector<T>& list, size_t n) {
    std::vector<std::vector<T>> result;
    for (size_t i = 0; i < list.size(); i += n) {
        result.emplace_back(list.begin() + i, list.begin() + std::min(i + n, list.size()));
    }
    return result;
}"
        }
    };
    Some(def)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_declare_their_name() {
        let helpers = [
            Helper::ListaAddita,
            Helper::ListaCongrega,
            Helper::TabulaInversa,
            Helper::CopiaSymmetrica,
        ];
        for helper in helpers {
            for target in CodegenTarget::ALL {
                if let Some(def) = helper.definition(target) {
                    assert!(
                        def.contains(helper.fn_name()),
                        "{helper:?} on {target} does not define {}",
                        helper.fn_name()
                    );
                }
            }
        }
    }

    #[test]
    fn test_zig_and_faber_have_no_helpers() {
        assert!(Helper::ListaAddita.definition(CodegenTarget::Zig).is_none());
        assert!(Helper::ListaAddita.definition(CodegenTarget::Faber).is_none());
    }

    #[test]
    fn test_cpp_covers_every_helper() {
        let all = [
            Helper::ListaRemove,
            Helper::ListaDecapita,
            Helper::ListaIndiceDe,
            Helper::ListaFragmenta,
            Helper::CopiaSubcopia,
            Helper::CopiaSupercopia,
        ];
        for helper in all {
            assert!(helper.definition(CodegenTarget::Cpp).is_some(), "{helper:?}");
        }
    }
}
